//! Ordered frequency counters
//!
//! Report tables list values by descending count with ties in the order the
//! values were first seen, so counters keep insertion order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// String → count counter preserving first-insertion order
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<(String, u64)>,
    positions: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `value`
    pub fn add(&mut self, value: impl Into<String>) {
        self.add_n(value, 1);
    }

    /// Count `n` occurrences of `value`
    pub fn add_n(&mut self, value: impl Into<String>, n: u64) {
        let value = value.into();
        match self.positions.get(&value) {
            Some(&pos) => self.entries[pos].1 += n,
            None => {
                self.positions.insert(value.clone(), self.entries.len());
                self.entries.push((value, n));
            }
        }
    }

    pub fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.add(value);
        }
    }

    /// Add every count of `other`
    pub fn merge(&mut self, other: &Tally) {
        for (value, count) in other.iter() {
            self.add_n(value, count);
        }
    }

    /// Count of `value` (0 when never seen)
    pub fn get(&self, value: &str) -> u64 {
        self.positions
            .get(value)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.positions.contains_key(value)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values with counts, in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(v, c)| (v.as_str(), *c))
    }

    /// Values by descending count; ties keep insertion order
    pub fn most_common(&self) -> Vec<(String, u64)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    /// Share of the total per value, in percent rounded to 2 decimals
    ///
    /// Ordered like [`Tally::most_common`].
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.most_common()
            .into_iter()
            .map(|(value, count)| {
                let percent = count as f64 / total as f64 * 100.0;
                (value, (percent * 100.0).round() / 100.0)
            })
            .collect()
    }
}

impl PartialEq for Tally {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<S: Into<String>> FromIterator<S> for Tally {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tally = Tally::new();
        tally.extend(iter);
        tally
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (value, count) in &self.entries {
            map.serialize_entry(value, count)?;
        }
        map.end()
    }
}

/// Two-level counter: outer value → inner [`Tally`]
///
/// Outer values keep first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct CrossTally {
    outer: Vec<(String, Tally)>,
    positions: HashMap<String, usize>,
}

impl CrossTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one co-occurrence of `outer` with `inner`
    pub fn add(&mut self, outer: impl Into<String>, inner: impl Into<String>) {
        let outer = outer.into();
        let pos = match self.positions.get(&outer) {
            Some(&pos) => pos,
            None => {
                self.positions.insert(outer.clone(), self.outer.len());
                self.outer.push((outer, Tally::new()));
                self.outer.len() - 1
            }
        };
        self.outer[pos].1.add(inner);
    }

    pub fn get(&self, outer: &str) -> Option<&Tally> {
        self.positions.get(outer).map(|&pos| &self.outer[pos].1)
    }

    pub fn len(&self) -> usize {
        self.outer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outer.is_empty()
    }

    /// Outer values with their inner tallies, in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tally)> {
        self.outer.iter().map(|(v, t)| (v.as_str(), t))
    }
}
