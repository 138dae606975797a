//! Extraction events and where they go
//!
//! The extractor never writes to the console itself. It records events
//! into an [`EventSink`]; the binary forwards them to `tracing`, tests keep
//! them in memory.

use crate::oracle::Operator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One oracle round trip.
    Query {
        op: Operator,
        probe: String,
        count: usize,
    },
    /// A scan step revealed ranks `[start, end)` sharing `prefix`.
    BatchRevealed {
        start: usize,
        end: usize,
        prefix: String,
    },
    /// Ranks left over after the alphabet scan.
    TailRevealed {
        start: usize,
        end: usize,
        prefix: String,
    },
    /// Next character of the secret at `rank` after `prefix`.
    CharacterResolved {
        rank: usize,
        prefix: String,
        character: char,
    },
    /// An anomalous count is being asked again.
    Retry {
        probe: String,
        observed: usize,
        attempt: u32,
    },
    SecretFound {
        rank: usize,
        secret: String,
    },
}

pub trait EventSink {
    fn record(&self, event: Event);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: Event) {
        match event {
            Event::Query { op, probe, count } => {
                tracing::debug!("[QUERY] {} {:?} => {}", op, probe, count);
            }
            Event::BatchRevealed { start, end, prefix } => {
                tracing::info!(
                    "[SCAN] {} new secret(s) at ranks [{}, {}) starting with {:?}",
                    end - start,
                    start,
                    end,
                    prefix
                );
            }
            Event::TailRevealed { start, end, prefix } => {
                tracing::info!(
                    "[SCAN] {} secret(s) at ranks [{}, {}) past the last probe, starting with {:?}",
                    end - start,
                    start,
                    end,
                    prefix
                );
            }
            Event::CharacterResolved {
                rank,
                prefix,
                character,
            } => {
                tracing::debug!("[REFINE] rank {} -> {:?} + {:?}", rank, prefix, character);
            }
            Event::Retry {
                probe,
                observed,
                attempt,
            } => {
                tracing::warn!(
                    "[REFINE] Unexpected count {} for {:?}, asking again ({})",
                    observed,
                    probe,
                    attempt
                );
            }
            Event::SecretFound { rank, secret } => {
                tracing::info!("[+] Found secret #{}: {}", rank, secret);
            }
        }
    }
}

/// Keeps every event for later inspection.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    events: std::sync::Mutex<Vec<Event>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl EventSink for MemorySink {
    fn record(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn record(&self, event: Event) {
        (**self).record(event)
    }
}
