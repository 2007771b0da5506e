//! Frequency tables over annotation columns
//!
//! Paper-level tables read each paper's first row; row-level tables read
//! every row. Multi-valued cells contribute each listed value.

use qcat_common::text::{is_blank, is_multiple, is_unspecified, split_multiple, BLANK_LABEL};
use qcat_common::{Column, Record, RecordIndex};

use crate::tally::Tally;

/// Values a single cell contributes to a frequency table
///
/// The cell is lowercased. Blank cells contribute nothing, or
/// [`BLANK_LABEL`] when `count_blank` is set.
pub fn cell_values(record: &Record, column: Column, count_blank: bool) -> Vec<String> {
    let value = record.get(column).to_lowercase();
    if is_multiple(&value) {
        split_multiple(&value, column)
    } else if !is_blank(value.trim()) {
        vec![value.trim().to_string()]
    } else if count_blank {
        vec![BLANK_LABEL.to_string()]
    } else {
        Vec::new()
    }
}

/// Paper-level value frequency of `column`
pub fn count_contents(index: &RecordIndex, column: Column, count_blank: bool) -> Tally {
    index
        .first_rows()
        .flat_map(|record| cell_values(record, column, count_blank))
        .collect()
}

/// Number of rows mentioning each value of `column`
///
/// A value listed twice in one cell counts once for that row.
pub fn unique_count_contents(index: &RecordIndex, column: Column) -> Tally {
    let mut tally = Tally::new();
    for record in index.rows() {
        let mut seen: Vec<String> = Vec::new();
        for value in cell_values(record, column, false) {
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        tally.extend(seen);
    }
    tally
}

/// Row-level value frequency of `column`, blanks included
pub fn count_all_contents(index: &RecordIndex, column: Column) -> Tally {
    index
        .rows()
        .flat_map(|record| cell_values(record, column, true))
        .collect()
}

/// Number of papers leaving `column` unspecified in their first row
pub fn count_empty(index: &RecordIndex, column: Column) -> usize {
    index
        .first_rows()
        .filter(|record| is_unspecified(&record.get(column).trim().to_lowercase()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, column: Column, value: &str) -> Record {
        Record::new(0).with(Column::Key, key).with(column, value)
    }

    fn task_index() -> RecordIndex {
        vec![
            row("p1", Column::SystemTask, "Multiple (list all): Summarisation, Dialogue"),
            row("p1", Column::SystemTask, "Summarisation"),
            row("p2", Column::SystemTask, "summarisation"),
            row("p3", Column::SystemTask, "none given"),
            row("p4", Column::SystemTask, "Dialogue, Dialogue"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_count_contents_first_rows_only() {
        let tally = count_contents(&task_index(), Column::SystemTask, false);
        assert_eq!(tally.get("summarisation"), 2);
        assert_eq!(tally.get("dialogue"), 1);
        assert_eq!(tally.get("dialogue, dialogue"), 1);
        assert_eq!(tally.get(BLANK_LABEL), 0);
    }

    #[test]
    fn test_count_contents_can_count_blanks() {
        let tally = count_contents(&task_index(), Column::SystemTask, true);
        assert_eq!(tally.get(BLANK_LABEL), 1);
    }

    #[test]
    fn test_unique_count_dedups_within_row() {
        let index: RecordIndex = vec![
            row("p1", Column::SystemLanguage, "multiple (list all): english, english, german"),
            row("p1", Column::SystemLanguage, "English"),
        ]
        .into_iter()
        .collect();
        let tally = unique_count_contents(&index, Column::SystemLanguage);
        assert_eq!(tally.get("english"), 2);
        assert_eq!(tally.get("german"), 1);
    }

    #[test]
    fn test_count_all_contents_includes_blanks() {
        let tally = count_all_contents(&task_index(), Column::SystemTask);
        assert_eq!(tally.get("summarisation"), 3);
        assert_eq!(tally.get(BLANK_LABEL), 1);
        assert_eq!(tally.total(), 6);
    }

    #[test]
    fn test_count_empty_reads_first_rows() {
        let index: RecordIndex = vec![
            row("p1", Column::OpForm, ""),
            row("p1", Column::OpForm, "rating"),
            row("p2", Column::OpForm, "Unclear"),
            row("p3", Column::OpForm, "ranking"),
        ]
        .into_iter()
        .collect();
        assert_eq!(count_empty(&index, Column::OpForm), 2);
    }
}
