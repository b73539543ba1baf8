const NOT_FOUND_STATUS: u16 = 404;
const GONE_STATUS: u16 = 410;

pub fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

/// Statuses the tracker returns for labels or comments that no longer exist.
pub(crate) fn is_already_gone_status(status: u16) -> bool {
    status == NOT_FOUND_STATUS || status == GONE_STATUS
}

#[cfg(test)]
mod tests {
    use super::{is_already_gone_status, truncate_for_error};

    #[test]
    fn unit_is_already_gone_status_matches_not_found_and_gone() {
        assert!(is_already_gone_status(404));
        assert!(is_already_gone_status(410));
        assert!(!is_already_gone_status(403));
        assert!(!is_already_gone_status(500));
    }

    #[test]
    fn regression_truncate_for_error_preserves_unicode_boundaries() {
        assert_eq!(truncate_for_error("ta🌊u", 3), "ta🌊...");
        assert_eq!(truncate_for_error("ok", 10), "ok");
    }
}
