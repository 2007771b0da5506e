//! Inter-annotator agreement
//!
//! Krippendorff's alpha over set-valued annotations, and a simpler
//! pairwise absolute agreement between sheets.
//!
//! Alpha treats papers as items and sheets as coders. For each item with at
//! least two labels the observed disagreement is
//! `Σ n_j·n_l·d(j, l) / (N·(N - 1))` over its label frequencies; items are
//! weighted by their label count. Expected disagreement is the same
//! quantity over the label frequencies pooled across those items, and
//! `alpha = 1 - observed / expected`.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use qcat_common::{Column, Error, Result, SheetScheme};

use crate::distance::{jaccard_distance, masi_distance, Distance};
use crate::loader::{AnnotationTable, LabelSet};

type Frequencies<'a> = BTreeMap<&'a BTreeSet<String>, u64>;

/// Mean pairwise distance within one frequency distribution of labels
fn disagreement(freqs: &Frequencies<'_>, distance: Distance) -> f64 {
    let total: u64 = freqs.values().sum();
    if total < 2 {
        return 0.0;
    }
    let mut pairs = 0.0;
    for (j, &nj) in freqs {
        for (l, &nl) in freqs {
            pairs += (nj * nl) as f64 * distance(l, j);
        }
    }
    pairs / (total * (total - 1)) as f64
}

/// Krippendorff's alpha of `annotations` under `distance`
///
/// Returns 1.0 when only one distinct label was ever used. Fails when
/// there is no data, or no item was labelled at least twice.
pub fn krippendorff_alpha(annotations: &[LabelSet], distance: Distance) -> Result<f64> {
    if annotations.is_empty() {
        return Err(Error::InvalidInput(
            "Cannot calculate alpha, no data present".to_string(),
        ));
    }

    let distinct: HashSet<&BTreeSet<String>> = annotations.iter().map(|a| &a.labels).collect();
    if distinct.len() == 1 {
        return Ok(1.0);
    }

    let coders: HashSet<usize> = annotations.iter().map(|a| a.source).collect();
    let mut items: BTreeMap<&str, Frequencies<'_>> = BTreeMap::new();
    for annotation in annotations {
        *items
            .entry(annotation.key.as_str())
            .or_default()
            .entry(&annotation.labels)
            .or_default() += 1;
    }
    if coders.len() == 1 && items.len() == 1 {
        return Err(Error::InvalidInput(
            "Cannot calculate alpha, only one coder and item present".to_string(),
        ));
    }

    let mut pooled: Frequencies<'_> = BTreeMap::new();
    let mut observed = 0.0;
    let mut skipped = 0usize;
    for freqs in items.values() {
        let count: u64 = freqs.values().sum();
        if count < 2 {
            skipped += 1;
            continue;
        }
        for (&labels, &n) in freqs {
            *pooled.entry(labels).or_default() += n;
        }
        observed += disagreement(freqs, distance) * count as f64;
    }
    if skipped > 0 {
        debug!(skipped, "Items with a single label left out of alpha");
    }

    let pooled_total: u64 = pooled.values().sum();
    if pooled_total == 0 {
        return Err(Error::InvalidInput(
            "Cannot calculate alpha, no item has two or more labels".to_string(),
        ));
    }

    let observed = observed / pooled_total as f64;
    let expected = disagreement(&pooled, distance);
    if expected == 0.0 {
        return Ok(1.0);
    }
    Ok(1.0 - observed / expected)
}

/// Alpha of one column under both distances
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAgreement {
    pub column: String,
    pub alpha_jaccard: Option<f64>,
    pub alpha_masi: Option<f64>,
}

fn column_agreement(column: &str, sets: &[LabelSet]) -> ColumnAgreement {
    let alpha = |distance: Distance, name: &str| match krippendorff_alpha(sets, distance) {
        Ok(alpha) => Some(alpha),
        Err(e) => {
            warn!(column, distance = name, "No alpha: {}", e);
            None
        }
    };
    ColumnAgreement {
        column: column.to_string(),
        alpha_jaccard: alpha(jaccard_distance, "jaccard"),
        alpha_masi: alpha(masi_distance, "masi"),
    }
}

/// Alpha (Jaccard and MASI) for every closed-class column of `scheme`
///
/// A final `criterion_paraphrase_top_level` entry compares criteria only at
/// the top level of the criterion hierarchy.
pub fn closed_class_agreement(table: &AnnotationTable, scheme: SheetScheme) -> Vec<ColumnAgreement> {
    let mut results: Vec<ColumnAgreement> = scheme
        .closed_class_columns()
        .iter()
        .map(|&column| column_agreement(column.as_str(), &table.label_sets(column)))
        .collect();
    results.push(column_agreement(
        "criterion_paraphrase_top_level",
        &table.top_level_criteria(scheme),
    ));
    results
}

/// Sheet × sheet absolute agreement for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseAgreement {
    pub column: String,
    /// Sheet numbers, in matrix order
    pub sources: Vec<usize>,
    /// Mean `1 - jaccard` over the papers both sheets annotated; `None`
    /// when they share no paper
    pub matrix: Vec<Vec<Option<f64>>>,
    /// Each sheet's mean agreement with the other sheets
    pub mean: Vec<Option<f64>>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Absolute agreement between every pair of sheets on `column`
///
/// Sheets are aligned on paper key.
pub fn pairwise_agreement(table: &AnnotationTable, column: Column) -> PairwiseAgreement {
    let sets = table.label_sets(column);
    let sources = table.sources();

    let by_source: Vec<BTreeMap<&str, &BTreeSet<String>>> = sources
        .iter()
        .map(|&source| {
            sets.iter()
                .filter(|s| s.source == source)
                .map(|s| (s.key.as_str(), &s.labels))
                .collect()
        })
        .collect();

    let matrix: Vec<Vec<Option<f64>>> = by_source
        .iter()
        .map(|a| {
            by_source
                .iter()
                .map(|b| {
                    mean(
                        a.iter()
                            .filter_map(|(key, la)| b.get(key).map(|lb| 1.0 - jaccard_distance(la, lb))),
                    )
                })
                .collect()
        })
        .collect();

    let mean_agreement = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            mean(
                row.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .filter_map(|(_, v)| *v),
            )
        })
        .collect();

    PairwiseAgreement {
        column: column.as_str().to_string(),
        sources,
        matrix,
        mean: mean_agreement,
    }
}
