//! Ordered character set used for comparison probes.
//!
//! The order of the characters must be the order the target's `lt` filter
//! respects. Nothing here can verify that; it only rejects sets that are
//! unusable outright.

/// Alphanumerics in ASCII order, which matches binary collation.
pub const DEFAULT_CHARSET: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    pub fn new(charset: &str) -> anyhow::Result<Self> {
        let chars: Vec<char> = charset.chars().collect();

        if chars.is_empty() {
            anyhow::bail!("Alphabet must contain at least one character");
        }

        for (i, c) in chars.iter().enumerate() {
            if chars[..i].contains(c) {
                anyhow::bail!("Alphabet contains duplicate character {:?}", c);
            }
        }

        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Character at `index`. Callers only pass indices produced by a search
    /// bounded by `len() - 1`.
    pub fn at(&self, index: usize) -> char {
        self.chars[index]
    }

    pub fn last(&self) -> char {
        self.chars[self.chars.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Highest valid index.
    pub fn max_index(&self) -> usize {
        self.chars.len() - 1
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            chars: DEFAULT_CHARSET.chars().collect(),
        }
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in &self.chars {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
