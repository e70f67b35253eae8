use daybook_sync::SyncResult;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Print a sync result, then turn a failed result into an error so the
/// process exits non-zero.
pub fn output_result(result: &SyncResult, format: OutputFormat) -> anyhow::Result<()> {
    output(result, format)?;
    for warning in result.warnings() {
        tracing::warn!("{warning}");
    }
    if let Some(failure) = result.failure() {
        anyhow::bail!("{} ({}: {})", result.message(), failure.reason, failure.detail);
    }
    Ok(())
}
