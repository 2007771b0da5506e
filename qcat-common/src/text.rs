//! Text normalization primitives for free-text annotation cells
//!
//! Annotators write "nothing here" in several ways, list several values in
//! one cell behind a `Multiple (list all):` prefix, and copy numbered labels
//! from the criterion taxonomy. These helpers undo those conventions.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::Column;

/// Markers meaning the paper does not give a value
pub const NOT_GIVEN: [&str; 3] = ["", "none given", "not given"];

/// [`NOT_GIVEN`] plus an explicit "blank"
pub const BLANK: [&str; 4] = ["", "none given", "not given", "blank"];

/// [`BLANK`] plus "unclear"
pub const UNSPECIFIED: [&str; 5] = ["", "none given", "not given", "blank", "unclear"];

/// Label used when blank cells are counted
pub const BLANK_LABEL: &str = "None Given/Blank";

static MULTIPLE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*multiple(?:\s*\(list all\))?\s*:?").expect("valid regex")
});

static SYSTEM_OUTPUT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)multiple \(list all\):").expect("valid regex"));

// A numbering token such as `2.`, `3a.`, `1.1.` or `4/2b.` at the start of
// a label, followed by whitespace.
static NUMBERING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<lead>^|[\s,:])\d*(?:[./]\d*)*\w\.\s").expect("valid regex")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

pub fn is_not_given(value: &str) -> bool {
    NOT_GIVEN.contains(&value)
}

pub fn is_blank(value: &str) -> bool {
    BLANK.contains(&value)
}

pub fn is_unspecified(value: &str) -> bool {
    UNSPECIFIED.contains(&value)
}

/// Whether a cell lists several values
pub fn is_multiple(value: &str) -> bool {
    value.to_lowercase().contains("multiple")
}

/// Remove a leading `Multiple (list all):` marker (any case)
pub fn strip_multiple_prefix(value: &str) -> String {
    MULTIPLE_PREFIX.replace(value, "").trim().to_string()
}

/// Split a multi-valued cell into its items
///
/// `system_output` cells drop the `multiple (list all):` marker wherever it
/// occurs; every other column keeps the text after the first colon. Items
/// are separated by `", "`. Empty items are dropped.
pub fn split_multiple(value: &str, column: Column) -> Vec<String> {
    let body = if column == Column::SystemOutput {
        SYSTEM_OUTPUT_PREFIX.replace_all(value, "").into_owned()
    } else {
        value.split(':').skip(1).collect::<Vec<_>>().join(" ")
    };

    body.trim()
        .split(", ")
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove taxonomy numbering, hyphens and dots from a standardized label
pub fn strip_numbering(value: &str) -> String {
    let mut unnumbered = value.replace('-', "");
    // A match consumes the space that would lead an adjacent token
    loop {
        let next = NUMBERING.replace_all(&unnumbered, "${lead} ").into_owned();
        if next == unnumbered {
            break;
        }
        unnumbered = next;
    }
    let without_dots = unnumbered.replace('.', "");
    WHITESPACE.replace_all(without_dots.trim(), " ").into_owned()
}

/// Split a standardized criterion cell into individual labels
///
/// Handles the multiple-values prefix, taxonomy numbering and comma
/// separation. Case is preserved; not-given markers are dropped.
pub fn standardized_labels(value: &str) -> Vec<String> {
    let body = strip_numbering(&strip_multiple_prefix(value));
    body.split(',')
        .map(str::trim)
        .filter(|label| !is_not_given(&label.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Lowercased, trimmed form used as a map key
pub fn canonical(value: &str) -> String {
    value.trim().to_lowercase()
}
