use crate::error::CliError;
use engine_runtime::execution::executor::ExportSummary;
use serde_json::json;
use std::path::Path;

fn generate_report_json(summary: &ExportSummary) -> Result<String, CliError> {
    let skipped: Vec<_> = summary
        .skipped
        .iter()
        .map(|s| {
            json!({
                "id": s.id.as_str(),
                "field": s.reason.path(),
                "reason": s.reason.to_string(),
            })
        })
        .collect();

    let report = json!({
        "output": summary.output().display().to_string(),
        "fetched": summary.fetched,
        "written": summary.written,
        "columns": summary.columns,
        "skipped": skipped,
        "duration_ms": summary.duration.as_millis() as u64,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

pub async fn write_report(summary: &ExportSummary, path: &Path) -> Result<(), CliError> {
    let report_json = generate_report_json(summary)?;
    tokio::fs::write(path, report_json).await?;
    Ok(())
}
