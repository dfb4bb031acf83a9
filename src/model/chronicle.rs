use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CHRONICLE_CAPACITY: usize = 100;

/// Bounded, player-facing log of date-stamped lines. Oldest entries are
/// evicted first once capacity is reached.
///
/// Equality compares lines only; capacity is a setting of the running
/// engine, not part of the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Chronicle {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Chronicle {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CHRONICLE_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: String) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line);
    }

    /// Change capacity, evicting the oldest lines if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// The most recent `n` lines, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        self.iter().skip(self.len().saturating_sub(n))
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }
}

impl Default for Chronicle {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CHRONICLE_CAPACITY)
    }
}

impl PartialEq for Chronicle {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Chronicle {}

/// Keeps every line; the owner trims with [`Chronicle::set_capacity`].
impl From<Vec<String>> for Chronicle {
    fn from(lines: Vec<String>) -> Self {
        Self {
            capacity: lines.len().max(DEFAULT_CHRONICLE_CAPACITY),
            entries: lines.into(),
        }
    }
}

impl From<Chronicle> for Vec<String> {
    fn from(c: Chronicle) -> Self {
        c.entries.into()
    }
}
