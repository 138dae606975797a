//! Range refinement
//!
//! Ranks `[start, end)` are known to share `prefix`, and `start` secrets sort
//! before all of them. Each task first takes out the owners whose secret is
//! exactly the prefix (they sort lowest), then binary-searches the next
//! character of every remaining rank. Because ranks are sorted, rank `r` is
//! below a probe exactly when the `lt` count exceeds `r`, and its character
//! is never lower than that of rank `r - 1`. Ranks landing on the same
//! character form a group that becomes a task one character deeper.

use crate::extract::events::{Event, EventSink};
use crate::extract::{ExtractionError, Extractor};
use crate::oracle::{Operator, Oracle};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Task {
    start: usize,
    end: usize,
    prefix: String,
}

impl<O: Oracle, S: EventSink> Extractor<O, S> {
    /// Discover the secrets at ranks `[start, end)`, all beginning with
    /// `prefix`. Returned in rank order.
    pub async fn refine(
        &mut self,
        start: usize,
        end: usize,
        prefix: &str,
    ) -> Result<Vec<String>, ExtractionError> {
        let mut found: Vec<(usize, String)> = Vec::new();
        let mut stack = vec![Task {
            start,
            end,
            prefix: prefix.to_string(),
        }];

        // Groups are pushed in reverse so they pop in rank order.
        while let Some(task) = stack.pop() {
            if task.start >= task.end {
                continue;
            }

            let size = task.end - task.start;
            let exact = self.ask(Operator::Equals, &task.prefix).await;
            if exact > size {
                tracing::warn!(
                    "[REFINE] {} owners equal {:?} but only {} ranks share it",
                    exact,
                    task.prefix,
                    size
                );
            }
            let exact = exact.min(size);

            for rank in task.start..task.start + exact {
                self.sink.record(Event::SecretFound {
                    rank,
                    secret: task.prefix.clone(),
                });
                found.push((rank, task.prefix.clone()));
            }

            let first = task.start + exact;
            if first == task.end {
                continue;
            }

            if task.prefix.chars().count() >= self.config.max_length {
                return Err(ExtractionError::SecretTooLong {
                    start: first,
                    end: task.end,
                    prefix: task.prefix,
                    max_length: self.config.max_length,
                });
            }

            let resolved = self.next_characters(first, task.end, &task.prefix).await?;
            let groups = group_ranks(first, &resolved)
                .into_iter()
                .map(|(group_start, group_end, index)| {
                    let mut prefix = task.prefix.clone();
                    prefix.push(self.config.alphabet.at(index));
                    Task {
                        start: group_start,
                        end: group_end,
                        prefix,
                    }
                })
                .collect::<Vec<_>>();

            stack.extend(groups.into_iter().rev());
        }

        found.sort_by_key(|(rank, _)| *rank);
        Ok(found.into_iter().map(|(_, secret)| secret).collect())
    }

    /// Alphabet index of the character after `prefix` for each rank in
    /// `[first, end)`. Non-decreasing by construction.
    async fn next_characters(
        &mut self,
        first: usize,
        end: usize,
        prefix: &str,
    ) -> Result<Vec<usize>, ExtractionError> {
        let mut resolved = Vec::with_capacity(end - first);
        let mut floor = 0;

        for rank in first..end {
            let mut min = floor;
            let mut max = self.config.alphabet.max_index();

            while min < max {
                let mid = (min + max + 1) / 2;
                let mut probe = prefix.to_string();
                probe.push(self.config.alphabet.at(mid));

                let count = self.bounded_less_than(&probe, rank, end).await?;
                if count == rank {
                    min = mid;
                } else {
                    max = mid - 1;
                }
            }

            self.sink.record(Event::CharacterResolved {
                rank,
                prefix: prefix.to_string(),
                character: self.config.alphabet.at(min),
            });
            resolved.push(min);
            floor = min;
        }

        Ok(resolved)
    }

    /// `lt` count that must lie in `[rank, end]`. Anything else is asked
    /// again, then treated as fatal.
    async fn bounded_less_than(
        &mut self,
        probe: &str,
        rank: usize,
        end: usize,
    ) -> Result<usize, ExtractionError> {
        let mut attempt = 0;
        loop {
            let count = self.ask(Operator::LessThan, probe).await;
            if (rank..=end).contains(&count) {
                return Ok(count);
            }

            if attempt >= self.config.ambiguity_retries {
                return Err(ExtractionError::AmbiguousCount {
                    probe: probe.to_string(),
                    rank,
                    observed: count,
                    end,
                });
            }

            attempt += 1;
            self.stats.retries += 1;
            self.sink.record(Event::Retry {
                probe: probe.to_string(),
                observed: count,
                attempt,
            });
        }
    }
}

/// Split consecutive equal indices into `(start, end, index)` rank ranges.
fn group_ranks(first: usize, resolved: &[usize]) -> Vec<(usize, usize, usize)> {
    let mut groups = Vec::new();
    let mut group_start = 0;

    for offset in 1..=resolved.len() {
        if offset == resolved.len() || resolved[offset] != resolved[group_start] {
            groups.push((first + group_start, first + offset, resolved[group_start]));
            group_start = offset;
        }
    }

    groups
}
