//! Runtime configuration for an extraction run

use crate::cli::args::Cli;
use crate::extract::{Alphabet, ExtractionConfig};
use crate::oracle::OracleTarget;
use crate::reporting::reporter::ReportFormat;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

pub struct Context {
    pub target: OracleTarget,
    pub extraction: ExtractionConfig,
    pub rate_limit: u32,
    pub timeout: Duration,
    pub retries: u32,
    // Authentication
    pub cookies: Option<String>,
    pub headers: HashMap<String, String>,
    // Reporting
    pub output_format: ReportFormat,
    pub output_file: Option<String>,
}

impl Context {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let url = Url::parse(&cli.target)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("Target must be an http(s) URL, got '{}'", cli.target);
        }

        if cli.max_length == 0 {
            anyhow::bail!("--max-length must be at least 1");
        }

        let mut target = OracleTarget::new(url);
        target.param = cli.param;
        target.records_key = cli.records_key;
        target.owner_key = cli.owner_key;

        let extraction = ExtractionConfig::new(Alphabet::new(&cli.charset)?)
            .with_max_length(cli.max_length)
            .with_ambiguity_retries(cli.ambiguity_retries);

        // Parse custom headers
        let mut headers = HashMap::new();
        for header in &cli.headers {
            match header.split_once(':') {
                Some((key, value)) => {
                    headers.insert(key.trim().to_string(), value.trim().to_string());
                }
                None => anyhow::bail!("Malformed header '{}' (expected 'Name: value')", header),
            }
        }

        Ok(Self {
            target,
            extraction,
            rate_limit: cli.rate,
            timeout: Duration::from_secs(cli.timeout),
            retries: cli.retries,
            cookies: cli.cookie,
            headers,
            output_format: cli.format.parse()?,
            output_file: cli.output,
        })
    }
}
