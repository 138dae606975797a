//! Secret extraction engine
//!
//! Reconstructs every value of a hidden string field using nothing but
//! owner counts for `lt` / `equals` comparisons:
//! - driver: scans the alphabet one character deep and finds where the
//!   `lt` count steps up, each step revealing a batch of ranks
//! - refine: binary-searches the next character of every rank in a batch,
//!   then splits the batch into groups sharing that character and repeats
//!   one level deeper until each group is confirmed with `equals`

pub mod alphabet;
pub mod driver;
pub mod events;
pub mod refine;

pub use alphabet::Alphabet;
pub use events::{Event, EventSink, TracingSink};

#[cfg(test)]
pub use events::MemorySink;

use crate::oracle::{Operator, Oracle};
use serde::Serialize;
use thiserror::Error;

/// Extraction configuration
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub alphabet: Alphabet,
    /// Longest secret the refiner will build before giving up
    pub max_length: usize,
    /// How many times an out-of-range count is asked again before aborting
    pub ambiguity_retries: u32,
}

impl ExtractionConfig {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            max_length: 128,
            ambiguity_retries: 2,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_ambiguity_retries(mut self, retries: u32) -> Self {
        self.ambiguity_retries = retries;
        self
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new(Alphabet::default())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Inconsistent oracle: {op} {probe:?} matched {observed} owners after {previous} were already counted")]
    Inconsistent {
        op: Operator,
        probe: String,
        previous: usize,
        observed: usize,
    },

    #[error("Ambiguous count {observed} for lt {probe:?} while resolving rank {rank} (expected {rank}..={end})")]
    AmbiguousCount {
        probe: String,
        rank: usize,
        observed: usize,
        end: usize,
    },

    #[error("Secrets at ranks [{start}, {end}) exceed {max_length} characters after {prefix:?}; they may use characters outside the alphabet")]
    SecretTooLong {
        start: usize,
        end: usize,
        prefix: String,
        max_length: usize,
    },
}

/// Oracle usage of a run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    pub less_than: usize,
    pub equals: usize,
    pub greater_or_equal: usize,
    pub retries: usize,
}

impl ExtractionStats {
    pub fn total(&self) -> usize {
        self.less_than + self.equals + self.greater_or_equal
    }
}

pub struct Extractor<O, S = TracingSink> {
    oracle: O,
    config: ExtractionConfig,
    sink: S,
    stats: ExtractionStats,
}

impl<O: Oracle> Extractor<O> {
    pub fn new(oracle: O, config: ExtractionConfig) -> Self {
        Self::with_sink(oracle, config, TracingSink)
    }
}

impl<O: Oracle, S: EventSink> Extractor<O, S> {
    pub fn with_sink(oracle: O, config: ExtractionConfig, sink: S) -> Self {
        Self {
            oracle,
            config,
            sink,
            stats: ExtractionStats::default(),
        }
    }

    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Single oracle round trip, counted and recorded.
    async fn ask(&mut self, op: Operator, probe: &str) -> usize {
        let count = self.oracle.count(op, probe).await;

        match op {
            Operator::LessThan => self.stats.less_than += 1,
            Operator::Equals => self.stats.equals += 1,
            Operator::GreaterOrEqual => self.stats.greater_or_equal += 1,
        }

        self.sink.record(Event::Query {
            op,
            probe: probe.to_string(),
            count,
        });

        count
    }
}
