use crate::reporting::model::ExtractionReport;
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    scan_metadata: ScanMetadata,
    result: &'a ExtractionReport,
}

#[derive(Serialize)]
struct ScanMetadata {
    tool: String,
    version: String,
    scan_date: String,
    report_format: String,
}

pub fn render(report: &ExtractionReport) -> anyhow::Result<String> {
    let report = Report {
        scan_metadata: ScanMetadata {
            tool: "tally".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            scan_date: chrono::Utc::now().to_rfc3339(),
            report_format: "application/json".to_string(),
        },
        result: report,
    };

    let json = serde_json::to_string_pretty(&report)?;
    Ok(json)
}
