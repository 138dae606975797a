//! Top-level alphabet scan
//!
//! `lt c` for each alphabet character `c` in order. Whenever the count rises
//! above what is already accounted for, the newly counted ranks all begin
//! with the previous character (or are below the whole alphabet when `c` is
//! the first one) and are handed to the refiner. Owners beginning with the
//! last character never cross any probe; they are caught by comparing the
//! total owner count once the scan is over.

use crate::extract::events::{Event, EventSink};
use crate::extract::{ExtractionError, Extractor};
use crate::oracle::{Operator, Oracle};

impl<O: Oracle, S: EventSink> Extractor<O, S> {
    /// Every secret held by the target, in rank order.
    pub async fn discover_all(&mut self) -> Result<Vec<String>, ExtractionError> {
        let alphabet = self.config.alphabet.clone();
        let mut discovered = Vec::new();
        let mut current = 0;
        let mut previous: Option<char> = None;

        for c in alphabet.iter() {
            let probe = c.to_string();
            let count = self.ask(Operator::LessThan, &probe).await;

            if count < current {
                return Err(ExtractionError::Inconsistent {
                    op: Operator::LessThan,
                    probe,
                    previous: current,
                    observed: count,
                });
            }

            if count > current {
                let prefix = previous.map(String::from).unwrap_or_default();
                self.sink.record(Event::BatchRevealed {
                    start: current,
                    end: count,
                    prefix: prefix.clone(),
                });
                discovered.extend(self.refine(current, count, &prefix).await?);
                current = count;
            }

            previous = Some(c);
        }

        let total = self.ask(Operator::GreaterOrEqual, "").await;
        if total < current {
            return Err(ExtractionError::Inconsistent {
                op: Operator::GreaterOrEqual,
                probe: String::new(),
                previous: current,
                observed: total,
            });
        }

        if total > current {
            let prefix = alphabet.last().to_string();
            self.sink.record(Event::TailRevealed {
                start: current,
                end: total,
                prefix: prefix.clone(),
            });
            discovered.extend(self.refine(current, total, &prefix).await?);
        }

        Ok(discovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Alphabet, ExtractionConfig, MemorySink};
    use crate::oracle::memory::{ScriptedOracle, SecretSetOracle};

    fn config(charset: &str) -> ExtractionConfig {
        ExtractionConfig::new(Alphabet::new(charset).unwrap())
    }

    async fn discover(secrets: &[&str], charset: &str) -> Vec<String> {
        let mut extractor = Extractor::new(SecretSetOracle::new(secrets), config(charset));
        extractor.discover_all().await.unwrap()
    }

    #[tokio::test]
    async fn test_round_trip() {
        let found = discover(&["xyz", "abd", "abc"], "abcdefghijklmnopqrstuvwxyz").await;
        assert_eq!(found, vec!["abc", "abd", "xyz"]);
    }

    #[tokio::test]
    async fn test_round_trip_default_alphabet() {
        let secrets = ["Zeta9", "alpha", "alphabet", "0000", "7Q", "alpha", "zzz"];
        let mut extractor = Extractor::new(SecretSetOracle::new(&secrets), ExtractionConfig::default());
        let found = extractor.discover_all().await.unwrap();

        let mut expected: Vec<String> = secrets.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_two_letter_alphabet_with_shared_maximum() {
        let sink = MemorySink::new();
        let oracle = SecretSetOracle::new(&["a", "b", "b"]);
        let mut extractor = Extractor::with_sink(oracle, config("ab"), &sink);

        assert_eq!(extractor.discover_all().await.unwrap(), vec!["a", "b", "b"]);

        let events = sink.events();
        assert!(events.contains(&Event::BatchRevealed {
            start: 0,
            end: 1,
            prefix: "a".to_string(),
        }));
        assert!(events.contains(&Event::TailRevealed {
            start: 1,
            end: 3,
            prefix: "b".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_secrets_on_last_character() {
        let found = discover(&["z", "zz", "zaz"], "abcdefghijklmnopqrstuvwxyz").await;
        assert_eq!(found, vec!["z", "zaz", "zz"]);
    }

    #[tokio::test]
    async fn test_first_character_secret() {
        let found = discover(&["0", "01"], "0123456789").await;
        assert_eq!(found, vec!["0", "01"]);
    }

    #[tokio::test]
    async fn test_empty_secret_below_alphabet() {
        let found = discover(&["", "b"], "abc").await;
        assert_eq!(found, vec!["", "b"]);
    }

    #[tokio::test]
    async fn test_no_secrets() {
        let mut extractor = Extractor::new(SecretSetOracle::new::<&str>(&[]), config("abc"));
        assert!(extractor.discover_all().await.unwrap().is_empty());
        assert_eq!(extractor.stats().less_than, 3);
        assert_eq!(extractor.stats().greater_or_equal, 1);
        assert_eq!(extractor.stats().equals, 0);
    }

    #[tokio::test]
    async fn test_idempotent() {
        let oracle = SecretSetOracle::new(&["mango", "kiwi", "kiwis", "fig"]);
        let mut extractor = Extractor::new(oracle, config("abcdefghijklmnopqrstuvwxyz"));

        let first = extractor.discover_all().await.unwrap();
        let second = extractor.discover_all().await.unwrap();
        assert_eq!(first, vec!["fig", "kiwi", "kiwis", "mango"]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_decreasing_count_is_fatal() {
        let oracle = ScriptedOracle::new(&["a", "b"]).answer(Operator::LessThan, "c", &[0]);
        let mut extractor = Extractor::new(oracle, config("abc"));

        let err = extractor.discover_all().await.unwrap_err();
        assert_eq!(
            err,
            ExtractionError::Inconsistent {
                op: Operator::LessThan,
                probe: "c".to_string(),
                previous: 1,
                observed: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_scan_stops_at_inconsistency() {
        let oracle = ScriptedOracle::new(&["a", "b"]).answer(Operator::LessThan, "c", &[0]);
        let mut extractor = Extractor::new(oracle, config("abcd"));

        assert!(extractor.discover_all().await.is_err());
        let probes: Vec<String> = extractor.oracle().queries().into_iter().map(|(_, p)| p).collect();
        assert!(!probes.contains(&"d".to_string()));
    }

    #[tokio::test]
    async fn test_total_below_counted_is_fatal() {
        let oracle = ScriptedOracle::new(&["a", "b"]).answer(Operator::GreaterOrEqual, "", &[1]);
        let mut extractor = Extractor::new(oracle, config("abc"));

        let err = extractor.discover_all().await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Inconsistent {
                op: Operator::GreaterOrEqual,
                previous: 2,
                observed: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_every_query_is_recorded() {
        let sink = MemorySink::new();
        let oracle = SecretSetOracle::new(&["hello"]);
        let mut extractor = Extractor::with_sink(oracle, config("ehlo"), &sink);

        assert_eq!(extractor.discover_all().await.unwrap(), vec!["hello"]);

        let recorded = sink
            .events()
            .iter()
            .filter(|e| matches!(e, Event::Query { .. }))
            .count();
        assert_eq!(recorded, extractor.stats().total());
        assert_eq!(recorded, extractor.oracle().query_count());
    }
}
