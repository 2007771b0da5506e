//! Criterion confusion indices
//!
//! A verbatim criterion is "confused" when annotators mapped it onto several
//! standardized criteria, and a standardized criterion is confused when
//! authors used several different names for it. Both directions are
//! recorded from the same rows.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use qcat_common::text::{canonical, is_not_given};
use qcat_common::{Column, RecordIndex};

use crate::criterion::standardized_criteria;

/// How criterion cells are compared when building the indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfusionMode {
    /// Cells as written
    Verbatim,
    /// Canonical labels, multi-valued standardized cells split
    Normalized,
}

/// Criterion → set of corresponding criteria, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct ConfusionIndex {
    entries: Vec<(String, BTreeSet<String>)>,
    positions: HashMap<String, usize>,
}

/// One line of a confusion table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionRow {
    pub criterion: String,
    pub corresponding: Vec<String>,
    pub amount: usize,
}

impl ConfusionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, criterion: impl Into<String>, corresponding: impl Into<String>) {
        let criterion = criterion.into();
        let pos = match self.positions.get(&criterion) {
            Some(&pos) => pos,
            None => {
                self.positions.insert(criterion.clone(), self.entries.len());
                self.entries.push((criterion, BTreeSet::new()));
                self.entries.len() - 1
            }
        };
        self.entries[pos].1.insert(corresponding.into());
    }

    pub fn get(&self, criterion: &str) -> Option<&BTreeSet<String>> {
        self.positions.get(criterion).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(c, set)| (c.as_str(), set))
    }

    /// Criteria with more than one corresponding criterion
    pub fn confused_count(&self) -> usize {
        self.entries.iter().filter(|(_, set)| set.len() > 1).count()
    }

    /// The `n` criteria with the most corresponding criteria
    ///
    /// Ties keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<ConfusionRow> {
        let mut ranked: Vec<&(String, BTreeSet<String>)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        ranked
            .into_iter()
            .take(n)
            .map(|(criterion, set)| ConfusionRow {
                criterion: criterion.clone(),
                corresponding: set.iter().cloned().collect(),
                amount: set.len(),
            })
            .collect()
    }
}

/// Both directions of criterion confusion
#[derive(Debug, Clone, Default)]
pub struct ConfusionIndices {
    /// Verbatim criterion → standardized criteria
    pub author: ConfusionIndex,
    /// Standardized criterion → verbatim criteria
    pub standardized: ConfusionIndex,
}

/// Build the author and standardized confusion indices
///
/// Rows without a verbatim criterion are skipped, as are empty standardized
/// cells.
pub fn build_confusion_indices(index: &RecordIndex, mode: ConfusionMode) -> ConfusionIndices {
    let mut indices = ConfusionIndices::default();

    for record in index.rows() {
        let verbatim = record.get(Column::CriterionVerbatim);
        if is_not_given(&canonical(verbatim)) {
            continue;
        }

        match mode {
            ConfusionMode::Verbatim => {
                let paraphrase = record.get(Column::CriterionParaphrase);
                if paraphrase.trim().is_empty() {
                    continue;
                }
                indices.author.insert(verbatim, paraphrase);
                indices.standardized.insert(paraphrase, verbatim);
            }
            ConfusionMode::Normalized => {
                let verbatim = canonical(verbatim);
                for standard in standardized_criteria(record) {
                    indices.author.insert(verbatim.clone(), standard.clone());
                    indices.standardized.insert(standard, verbatim.clone());
                }
            }
        }
    }

    indices
}

/// Top `n` rows of a confusion index
pub fn confusion_table(index: &ConfusionIndex, n: usize) -> Vec<ConfusionRow> {
    index.top(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_common::Record;

    fn row(key: &str, verbatim: &str, paraphrase: &str) -> Record {
        Record::new(0)
            .with(Column::Key, key)
            .with(Column::CriterionVerbatim, verbatim)
            .with(Column::CriterionParaphrase, paraphrase)
    }

    fn sample() -> RecordIndex {
        vec![
            row("p1", "Readability", "Fluency"),
            row("p1", "readability", "Multiple (list all): 1. Fluency, 2. Clarity"),
            row("p2", "Naturalness", "Fluency"),
            row("p3", "None given", "Coherence"),
            row("p4", "Coherence", ""),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_verbatim_mode_keeps_cells_as_written() {
        let indices = build_confusion_indices(&sample(), ConfusionMode::Verbatim);

        assert_eq!(indices.author.len(), 3);
        assert_eq!(indices.author.get("Readability").map(BTreeSet::len), Some(1));
        assert!(indices.author.get("Coherence").is_none());

        let fluency = indices.standardized.get("Fluency").unwrap();
        assert!(fluency.contains("Readability"));
        assert!(fluency.contains("Naturalness"));
        assert!(indices.standardized.get("Coherence").is_none());
    }

    #[test]
    fn test_normalized_mode_splits_labels() {
        let indices = build_confusion_indices(&sample(), ConfusionMode::Normalized);

        let readability = indices.author.get("readability").unwrap();
        let labels: Vec<&str> = readability.iter().map(String::as_str).collect();
        assert_eq!(labels, vec!["clarity", "fluency"]);

        let fluency = indices.standardized.get("fluency").unwrap();
        assert_eq!(fluency.len(), 2);
        assert_eq!(indices.standardized.get("clarity").map(BTreeSet::len), Some(1));
        assert_eq!(indices.author.confused_count(), 1);
        assert_eq!(indices.standardized.confused_count(), 1);
    }

    #[test]
    fn test_top_orders_by_set_size() {
        let mut index = ConfusionIndex::new();
        index.insert("a", "x");
        index.insert("b", "x");
        index.insert("b", "y");
        index.insert("c", "z");
        index.insert("c", "z");

        let rows = confusion_table(&index, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            ConfusionRow {
                criterion: "b".to_string(),
                corresponding: vec!["x".to_string(), "y".to_string()],
                amount: 2
            }
        );
        assert_eq!(rows[1].criterion, "a");
        assert_eq!(index.top(10).len(), 3);
    }
}
