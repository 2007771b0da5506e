//! Criterion label normalization
//!
//! Each annotation row pairs the criterion name the authors used (verbatim)
//! with the annotator's standardized criterion from the taxonomy. Verbatim
//! names are free text; standardized cells may list several numbered labels.
//! This module reduces both to canonical keys and enumerates the
//! many-to-many verbatim ↔ standardized pairs the cross-tabulations and
//! confusion tables are built from.

use qcat_common::text::{canonical, is_not_given, standardized_labels};
use qcat_common::{Column, Record, RecordIndex};

use crate::tally::Tally;

/// Canonical verbatim criterion of a row, if the authors named one
pub fn verbatim_criterion(record: &Record) -> Option<String> {
    let verbatim = canonical(record.get(Column::CriterionVerbatim));
    (!is_not_given(&verbatim)).then_some(verbatim)
}

/// Canonical standardized criteria of a row, deduplicated, in cell order
pub fn standardized_criteria(record: &Record) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in standardized_labels(record.get(Column::CriterionParaphrase)) {
        let label = canonical(&label);
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

/// Every (verbatim, standardized) pair, row by row in index order
pub fn criterion_pairs(index: &RecordIndex) -> Vec<(String, String)> {
    index
        .rows()
        .filter_map(|record| verbatim_criterion(record).map(|v| (v, record)))
        .flat_map(|(verbatim, record)| {
            standardized_criteria(record)
                .into_iter()
                .map(move |standard| (verbatim.clone(), standard))
        })
        .collect()
}

/// Frequency of standardized criteria over each paper's first row
///
/// Labels keep their original case.
pub fn paraphrase_frequency(index: &RecordIndex) -> Tally {
    index
        .first_rows()
        .flat_map(|record| standardized_labels(record.get(Column::CriterionParaphrase)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, verbatim: &str, paraphrase: &str) -> Record {
        Record::new(0)
            .with(Column::Key, key)
            .with(Column::CriterionVerbatim, verbatim)
            .with(Column::CriterionParaphrase, paraphrase)
    }

    #[test]
    fn test_verbatim_criterion_skips_not_given() {
        assert_eq!(
            verbatim_criterion(&row("p", " Fluency ", "")),
            Some("fluency".to_string())
        );
        assert_eq!(verbatim_criterion(&row("p", "None given", "")), None);
        assert_eq!(verbatim_criterion(&row("p", "", "")), None);
    }

    #[test]
    fn test_standardized_criteria_dedup_and_canonicalize() {
        let record = row("p", "quality", "Multiple (list all): 1. Fluency, 2. fluency, 3a. Clarity");
        assert_eq!(standardized_criteria(&record), vec!["fluency", "clarity"]);
    }

    #[test]
    fn test_criterion_pairs_are_many_to_many() {
        let index: RecordIndex = vec![
            row("p1", "Readability", "Multiple (list all): Fluency, Clarity"),
            row("p1", "not given", "Coherence"),
            row("p2", "Fluency", "Fluency"),
        ]
        .into_iter()
        .collect();

        let pairs = criterion_pairs(&index);
        assert_eq!(
            pairs,
            vec![
                ("readability".to_string(), "fluency".to_string()),
                ("readability".to_string(), "clarity".to_string()),
                ("fluency".to_string(), "fluency".to_string()),
            ]
        );
    }

    #[test]
    fn test_paraphrase_frequency_uses_first_rows() {
        let index: RecordIndex = vec![
            row("p1", "a", "Multiple (list all): 1. Fluency, 2. Clarity"),
            row("p1", "b", "Coherence"),
            row("p2", "c", "3. Fluency"),
        ]
        .into_iter()
        .collect();

        let tally = paraphrase_frequency(&index);
        assert_eq!(tally.get("Fluency"), 2);
        assert_eq!(tally.get("Clarity"), 1);
        assert_eq!(tally.get("Coherence"), 0);
    }
}
