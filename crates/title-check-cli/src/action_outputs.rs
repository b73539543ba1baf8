use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Escapes a message for a workflow command such as `::error::`.
pub(crate) fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub(crate) fn emit_error(message: &str) {
    println!("::error::{}", escape_workflow_data(message));
}

pub(crate) fn emit_notice(message: &str) {
    println!("::notice::{}", escape_workflow_data(message));
}

/// Appends `key=value` to the step output file, if the runner provided one.
pub(crate) fn write_action_output(path: Option<&Path>, key: &str, value: &str) -> Result<()> {
    let Some(path) = path else {
        debug!(key, value, "no output file configured; skipping step output");
        return Ok(());
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open step output file {}", path.display()))?;
    writeln!(file, "{key}={value}")
        .with_context(|| format!("failed to write step output {key}"))?;
    Ok(())
}
