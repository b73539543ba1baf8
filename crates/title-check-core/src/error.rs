use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
/// Terminal failures of a title check invocation.
pub enum TitleCheckError {
    /// No usable validation rule could be derived from the inputs.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("unsupported event '{0}': only 'issues' events are handled")]
    UnsupportedEvent(String),
    #[error("malformed event payload: {0}")]
    MalformedPayload(String),
    /// The issue tracker rejected or failed a call. Never retried here.
    ///
    /// The cause is only reachable through `source`, so `{:#}` prints it once.
    #[error("issue tracker {operation} failed")]
    RemoteState {
        operation: &'static str,
        /// Flattened cause chain, for matching without walking `source`.
        detail: String,
        #[source]
        source: BoxError,
    },
}

impl TitleCheckError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn remote(operation: &'static str, error: anyhow::Error) -> Self {
        Self::RemoteState {
            operation,
            detail: format!("{error:#}"),
            source: error.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::TitleCheckError;
    use std::error::Error as _;

    #[test]
    fn unit_remote_error_keeps_operation_and_full_context_chain() {
        let cause = anyhow::anyhow!("status 403").context("github api delete comment failed");
        let error = TitleCheckError::remote("delete comment", cause);
        assert_eq!(error.to_string(), "issue tracker delete comment failed");
        let TitleCheckError::RemoteState { detail, .. } = &error else {
            panic!("expected remote state error");
        };
        assert_eq!(detail, "github api delete comment failed: status 403");
        assert!(error.source().is_some());
    }

    #[test]
    fn regression_alternate_format_prints_remote_cause_once() {
        let cause = anyhow::anyhow!("status 403: denied")
            .context("github api create issue comment failed");
        let error = anyhow::Error::new(TitleCheckError::remote("create comment", cause));
        let rendered = format!("{error:#}");
        assert_eq!(
            rendered,
            "issue tracker create comment failed: github api create issue comment failed: \
             status 403: denied"
        );
        assert_eq!(rendered.matches("status 403").count(), 1);
    }

    #[test]
    fn unit_configuration_error_is_distinguishable() {
        assert!(TitleCheckError::configuration("no rule").is_configuration());
        assert!(!TitleCheckError::UnsupportedEvent("push".to_string()).is_configuration());
    }
}
