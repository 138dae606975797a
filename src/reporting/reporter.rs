use crate::reporting::model::ExtractionReport;
use crate::reporting::{json, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => anyhow::bail!("Unknown report format '{}' (expected text or json)", other),
        }
    }
}

pub struct Reporter {
    format: ReportFormat,
    output: Option<String>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output: Option<String>) -> Self {
        Self { format, output }
    }

    pub fn render(&self, report: &ExtractionReport) -> anyhow::Result<String> {
        match self.format {
            ReportFormat::Text => Ok(text::render(report)),
            ReportFormat::Json => json::render(report),
        }
    }

    /// Write the report to the output file, or stdout when none was given
    pub fn emit(&self, report: &ExtractionReport) -> anyhow::Result<()> {
        let rendered = self.render(report)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &rendered)?;
                tracing::info!("Report written to {}", path);
            }
            None => println!("{}", rendered),
        }

        Ok(())
    }
}
