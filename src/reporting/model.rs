use crate::extract::ExtractionStats;
use serde::Serialize;

/// Outcome of a completed extraction run
#[derive(Debug, Serialize, Clone)]
pub struct ExtractionReport {
    pub target: String,
    pub parameter: String,
    pub alphabet: String,
    /// In rank order, one entry per owner
    pub secrets: Vec<String>,
    pub distinct_secrets: usize,
    pub queries: ExtractionStats,
    pub elapsed_ms: u128,
}

impl ExtractionReport {
    pub fn new(
        target: &str,
        parameter: &str,
        alphabet: &str,
        secrets: Vec<String>,
        queries: ExtractionStats,
        elapsed_ms: u128,
    ) -> Self {
        let mut distinct = secrets.clone();
        distinct.dedup();

        Self {
            target: target.to_string(),
            parameter: parameter.to_string(),
            alphabet: alphabet.to_string(),
            distinct_secrets: distinct.len(),
            secrets,
            queries,
            elapsed_ms,
        }
    }
}
