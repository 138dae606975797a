//! In-memory oracles for tests.

use crate::oracle::{Operator, Oracle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Answers from a known list of secrets, one owner per entry.
pub struct SecretSetOracle {
    secrets: Vec<String>,
    queries: Mutex<Vec<(Operator, String)>>,
}

impl SecretSetOracle {
    pub fn new<S: AsRef<str>>(secrets: &[S]) -> Self {
        Self {
            secrets: secrets.iter().map(|s| s.as_ref().to_string()).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every query issued so far, in order.
    pub fn queries(&self) -> Vec<(Operator, String)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn evaluate(&self, op: Operator, probe: &str) -> usize {
        self.secrets
            .iter()
            .filter(|secret| match op {
                Operator::LessThan => secret.as_str() < probe,
                Operator::Equals => secret.as_str() == probe,
                Operator::GreaterOrEqual => secret.as_str() >= probe,
            })
            .count()
    }
}

impl Oracle for SecretSetOracle {
    async fn count(&self, op: Operator, probe: &str) -> usize {
        self.queries.lock().unwrap().push((op, probe.to_string()));
        self.evaluate(op, probe)
    }
}

/// Wraps a [`SecretSetOracle`] and overrides chosen answers.
///
/// Each scripted entry is a queue consumed one answer per matching query;
/// once it runs dry the real answer is returned.
pub struct ScriptedOracle {
    inner: SecretSetOracle,
    script: Mutex<HashMap<(Operator, String), Vec<usize>>>,
}

impl ScriptedOracle {
    pub fn new<S: AsRef<str>>(secrets: &[S]) -> Self {
        Self {
            inner: SecretSetOracle::new(secrets),
            script: Mutex::new(HashMap::new()),
        }
    }

    pub fn answer(self, op: Operator, probe: &str, answers: &[usize]) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert((op, probe.to_string()), answers.iter().rev().copied().collect());
        self
    }

    pub fn queries(&self) -> Vec<(Operator, String)> {
        self.inner.queries()
    }
}

impl Oracle for ScriptedOracle {
    async fn count(&self, op: Operator, probe: &str) -> usize {
        let real = self.inner.count(op, probe).await;
        let mut script = self.script.lock().unwrap();
        match script.get_mut(&(op, probe.to_string())).and_then(|q| q.pop()) {
            Some(scripted) => scripted,
            None => real,
        }
    }
}
