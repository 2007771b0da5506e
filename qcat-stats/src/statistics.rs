//! Statistical-method naming normalization
//!
//! The `op_statistics` column lists the statistics a paper reports on its
//! human evaluation, written however the authors wrote them ("SD",
//! "standard dev", "2-tailed t-test", "Analysis of Variance"...). Two
//! tallies are produced: the raw lowercased terms, and terms mapped onto one
//! name per method.

use once_cell::sync::Lazy;
use regex::Regex;

use qcat_common::{Column, RecordIndex};

use crate::tally::Tally;

static TAILS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(2|two|Two)-tail(ed)*").expect("valid regex"));

static ANALYSIS_OF_VARIANCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[Aa]nalysis [Oo]f [Vv]ariance").expect("valid regex"));

static MANN_WHITNEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Mann-Whitney.*U").expect("valid regex"));

static CHI_SQUARED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[Cc]hi[- ]sq").expect("valid regex"));

static RATIO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[Rr]atio").expect("valid regex"));

/// Exact spellings with a fixed canonical name
const EXACT_TERMS: &[(&str, &str)] = &[
    ("SD", "standard deviation"),
    ("standard dev", "standard deviation"),
    ("Mean", "mean"),
    ("means", "mean"),
    ("raw counts", "raw numbers"),
];

/// Split a statistics cell into terms
///
/// Cells listing several statistics use `,` or, failing that, `;`.
/// Blank and "none given" cells (any case) have no terms.
pub fn split_statistics(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none given") {
        return Vec::new();
    }
    let separator = if trimmed.contains(',') { ',' } else { ';' };
    trimmed
        .split(separator)
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

/// Spell every one- or two-tailed variant as `two-tailed`
pub fn normalize_tails(value: &str) -> String {
    TAILS.replace_all(value, "two-tailed").into_owned()
}

/// Canonical name of a statistical method; unknown terms pass through
pub fn normalize_statistic(term: &str) -> String {
    if let Some((_, canonical)) = EXACT_TERMS.iter().find(|(spelling, _)| *spelling == term) {
        return canonical.to_string();
    }

    let canonical = if term.contains("ANOVA") {
        "ANOVA"
    } else if term.contains("Kruskal-Wallis") {
        "Kruskal-Wallis"
    } else if ANALYSIS_OF_VARIANCE.is_match(term) {
        "ANOVA"
    } else if MANN_WHITNEY.is_match(term) {
        "Mann-Whitney U-test"
    } else if CHI_SQUARED.is_match(term) {
        "Chi-squared"
    } else if RATIO.is_match(term) {
        "ratio"
    } else if term.contains("percentage") {
        "proportion"
    } else if term.contains("specif") {
        "underspecified"
    } else if term.starts_with("t-test") {
        "t-test"
    } else {
        term
    };
    canonical.to_string()
}

/// Raw statistics terms, lowercased, over each paper's first row
pub fn statistics_frequency(index: &RecordIndex) -> Tally {
    index
        .first_rows()
        .flat_map(|record| split_statistics(&record.get(Column::OpStatistics).to_lowercase()))
        .collect()
}

/// Normalized statistics terms over each paper's first row
pub fn normalized_statistics_frequency(index: &RecordIndex) -> Tally {
    index
        .first_rows()
        .flat_map(|record| split_statistics(&normalize_tails(record.get(Column::OpStatistics))))
        .map(|term| normalize_statistic(&term))
        .collect()
}
