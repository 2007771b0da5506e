//! Cross-tabulations
//!
//! Year splits, task ↔ criterion tables, verbatim → standardized mappings,
//! and how consistently papers name and define their criteria.

use serde::Serialize;
use tracing::warn;

use qcat_common::text::{
    canonical, is_multiple, is_not_given, is_unspecified, split_multiple, strip_multiple_prefix,
};
use qcat_common::{Column, Record, RecordIndex};

use crate::criterion::{standardized_criteria, verbatim_criterion};
use crate::tally::{CrossTally, Tally};

/// Counts of one value before and from the split year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSplitRow {
    pub value: String,
    pub before: u64,
    pub after: u64,
    pub total: u64,
}

/// Join two tallies into rows sorted by descending total
fn year_split_rows(before: &Tally, after: &Tally) -> Vec<YearSplitRow> {
    let mut order = Tally::new();
    order.merge(before);
    order.merge(after);

    let mut rows: Vec<YearSplitRow> = order
        .iter()
        .map(|(value, total)| YearSplitRow {
            value: value.to_string(),
            before: before.get(value),
            after: after.get(value),
            total,
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Paper-level values of `column` split by publication year
///
/// Papers without a usable year are left out.
pub fn year_wise_counts(index: &RecordIndex, column: Column, split_year: i32) -> Vec<YearSplitRow> {
    let mut before = Tally::new();
    let mut after = Tally::new();

    for paper in index.papers() {
        let record = paper.first();
        let Some(year) = record.pub_year() else {
            warn!(paper = %paper.key, "No publication year, skipping in year-wise counts");
            continue;
        };

        let value = record.get(column).to_lowercase();
        let values = if is_multiple(&value) {
            split_multiple(&value, column)
        } else if !value.trim().is_empty() {
            vec![value.trim().to_string()]
        } else {
            Vec::new()
        };

        if year < split_year {
            before.extend(values);
        } else {
            after.extend(values);
        }
    }

    year_split_rows(&before, &after)
}

/// Rows giving both a verbatim criterion and its definition, by year
pub fn year_wise_defined_criteria(index: &RecordIndex, split_year: i32) -> Vec<YearSplitRow> {
    let mut before = Tally::new();
    let mut after = Tally::new();

    for record in index.rows() {
        let Some(verbatim) = verbatim_criterion(record) else {
            continue;
        };
        if is_not_given(&canonical(record.get(Column::CriterionDefinitionVerbatim))) {
            continue;
        }
        match record.pub_year() {
            Some(year) if year < split_year => before.add(verbatim),
            Some(_) => after.add(verbatim),
            None => warn!(paper = %record.key(), "No publication year, skipping defined criterion"),
        }
    }

    year_split_rows(&before, &after)
}

/// How often a verbatim criterion comes with a definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionPresenceRow {
    pub criterion: String,
    pub given: u64,
    pub not_given: u64,
}

/// Per verbatim criterion (as written), rows with and without a definition
pub fn verbatim_definition_presence(index: &RecordIndex) -> Vec<DefinitionPresenceRow> {
    let mut given = Tally::new();
    let mut not_given = Tally::new();
    let mut order = Tally::new();

    for record in index.rows() {
        let verbatim = record.get(Column::CriterionVerbatim);
        if is_not_given(verbatim) {
            continue;
        }
        order.add(verbatim);
        if is_not_given(record.get(Column::CriterionDefinitionVerbatim)) {
            not_given.add(verbatim);
        } else {
            given.add(verbatim);
        }
    }

    order
        .iter()
        .map(|(criterion, _)| DefinitionPresenceRow {
            criterion: criterion.to_string(),
            given: given.get(criterion),
            not_given: not_given.get(criterion),
        })
        .collect()
}

/// Rows with and without a verbatim definition, split by year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefinitionSummary {
    pub given_before: u64,
    pub given_after: u64,
    pub not_given_before: u64,
    pub not_given_after: u64,
    /// Rows left out for lack of a publication year
    pub undated: u64,
}

impl DefinitionSummary {
    pub fn given_total(&self) -> u64 {
        self.given_before + self.given_after
    }

    pub fn not_given_total(&self) -> u64 {
        self.not_given_before + self.not_given_after
    }
}

/// Definition presence over every row, whether or not a criterion is named
pub fn definition_summary(index: &RecordIndex, split_year: i32) -> DefinitionSummary {
    let mut summary = DefinitionSummary::default();

    for record in index.rows() {
        let given = !is_unspecified(&canonical(record.get(Column::CriterionDefinitionVerbatim)));
        match (record.pub_year().map(|y| y < split_year), given) {
            (None, _) => summary.undated += 1,
            (Some(true), true) => summary.given_before += 1,
            (Some(false), true) => summary.given_after += 1,
            (Some(true), false) => summary.not_given_before += 1,
            (Some(false), false) => summary.not_given_after += 1,
        }
    }

    summary
}

/// One cell of a task × criterion table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCriterionRow {
    pub task: String,
    pub criterion: String,
    pub count: u64,
}

impl TaskCriterionRow {
    /// CSV header, in field order
    pub const HEADER: [&'static str; 3] = ["task", "criterion", "count"];
}

/// Canonical tasks of a row
fn row_tasks(record: &Record) -> Vec<String> {
    let task = record.get(Column::SystemTask).to_lowercase();
    if is_multiple(&task) {
        split_multiple(&task, Column::SystemTask)
    } else {
        vec![canonical(&strip_multiple_prefix(&task))]
    }
}

/// Flatten a task cross-tally in `task_tally` most-common order
fn task_rows(cross: &CrossTally, task_tally: &Tally) -> Vec<TaskCriterionRow> {
    let mut rows = Vec::new();
    for (task, _) in task_tally.most_common() {
        let Some(criteria) = cross.get(&task) else {
            continue;
        };
        for (criterion, count) in criteria.most_common() {
            rows.push(TaskCriterionRow {
                task: task.clone(),
                criterion,
                count,
            });
        }
    }
    rows
}

/// Verbatim criteria used per task
///
/// Rows follow `task_tally` (normally the paper-level task frequency);
/// within a task, criteria are ordered by count.
pub fn task_to_criterion(index: &RecordIndex, task_tally: &Tally) -> Vec<TaskCriterionRow> {
    let mut cross = CrossTally::new();
    for record in index.rows() {
        let Some(verbatim) = verbatim_criterion(record) else {
            continue;
        };
        for task in row_tasks(record) {
            cross.add(task, verbatim.clone());
        }
    }
    task_rows(&cross, task_tally)
}

/// Standardized criteria used per task
pub fn task_to_standardized_criterion(
    index: &RecordIndex,
    task_tally: &Tally,
) -> Vec<TaskCriterionRow> {
    let mut cross = CrossTally::new();
    for record in index.rows() {
        let criteria = standardized_criteria(record);
        for task in row_tasks(record) {
            for criterion in &criteria {
                cross.add(task.clone(), criterion.clone());
            }
        }
    }
    task_rows(&cross, task_tally)
}

/// One verbatim → standardized mapping with its frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRow {
    pub verbatim: String,
    pub standardized: String,
    pub count: u64,
}

impl MappingRow {
    /// CSV header, in field order
    pub const HEADER: [&'static str; 3] = ["verbatim", "standardized", "count"];
}

/// Standardized criteria each verbatim criterion was mapped to
///
/// Verbatim criteria appear in index order; their mappings by count.
/// Unspecified verbatim criteria are left out.
pub fn verbatim_to_standardized(index: &RecordIndex) -> Vec<MappingRow> {
    let mut cross = CrossTally::new();
    for record in index.rows() {
        let verbatim = canonical(record.get(Column::CriterionVerbatim));
        if is_unspecified(&verbatim) {
            continue;
        }
        for standard in standardized_criteria(record) {
            cross.add(verbatim.clone(), standard);
        }
    }

    cross
        .iter()
        .flat_map(|(verbatim, mappings)| {
            mappings
                .most_common()
                .into_iter()
                .map(move |(standardized, count)| MappingRow {
                    verbatim: verbatim.to_string(),
                    standardized,
                    count,
                })
        })
        .collect()
}

/// Which criterion element a specification row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecificationKind {
    Criteria,
    Definitions,
}

/// In how many of a paper's rows an element is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    All,
    Some,
    No,
}

impl Frequency {
    fn of(present: &[bool]) -> Self {
        if present.iter().all(|&p| p) {
            Frequency::All
        } else if present.iter().any(|&p| p) {
            Frequency::Some
        } else {
            Frequency::No
        }
    }
}

/// Whether one paper names (or defines) its criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperSpecification {
    pub paper: String,
    pub kind: SpecificationKind,
    pub frequency: Frequency,
}

/// Papers per frequency for one kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyCounts {
    pub all: u64,
    pub some: u64,
    pub no: u64,
}

impl FrequencyCounts {
    fn add(&mut self, frequency: Frequency) {
        match frequency {
            Frequency::All => self.all += 1,
            Frequency::Some => self.some += 1,
            Frequency::No => self.no += 1,
        }
    }
}

/// How consistently papers name and define their criteria
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpecificationReport {
    pub papers: Vec<PaperSpecification>,
    pub criteria: FrequencyCounts,
    pub definitions: FrequencyCounts,
}

fn is_present(record: &Record, column: Column) -> bool {
    !is_not_given(record.get(column))
}

/// Per paper: are criteria names and definitions given in all, some, or no rows
pub fn specification_frequency(index: &RecordIndex) -> SpecificationReport {
    let mut report = SpecificationReport::default();

    for paper in index.papers() {
        for (kind, column) in [
            (SpecificationKind::Criteria, Column::CriterionVerbatim),
            (SpecificationKind::Definitions, Column::CriterionDefinitionVerbatim),
        ] {
            let present: Vec<bool> = paper.rows.iter().map(|r| is_present(r, column)).collect();
            let frequency = Frequency::of(&present);
            match kind {
                SpecificationKind::Criteria => report.criteria.add(frequency),
                SpecificationKind::Definitions => report.definitions.add(frequency),
            }
            report.papers.push(PaperSpecification {
                paper: paper.key.clone(),
                kind,
                frequency,
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, year: &str) -> Record {
        Record::new(0).with(Column::Key, key).with(Column::PubYear, year)
    }

    #[test]
    fn test_year_wise_counts_splits_on_year() {
        let index: RecordIndex = vec![
            row("p1", "2005").with(Column::SystemLanguage, "English"),
            row("p1", "2005").with(Column::SystemLanguage, "German"),
            row("p2", "2010").with(Column::SystemLanguage, "multiple (list all): english, german"),
            row("p3", "2015").with(Column::SystemLanguage, "english"),
            row("p4", "").with(Column::SystemLanguage, "english"),
        ]
        .into_iter()
        .collect();

        let rows = year_wise_counts(&index, Column::SystemLanguage, 2010);
        assert_eq!(
            rows[0],
            YearSplitRow {
                value: "english".to_string(),
                before: 1,
                after: 2,
                total: 3
            }
        );
        assert_eq!(
            rows[1],
            YearSplitRow {
                value: "german".to_string(),
                before: 0,
                after: 1,
                total: 1
            }
        );
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_defined_criteria_require_definition() {
        let index: RecordIndex = vec![
            row("p1", "2005")
                .with(Column::CriterionVerbatim, "Fluency")
                .with(Column::CriterionDefinitionVerbatim, "reads well"),
            row("p1", "2005")
                .with(Column::CriterionVerbatim, "Adequacy")
                .with(Column::CriterionDefinitionVerbatim, "none given"),
            row("p2", "2018")
                .with(Column::CriterionVerbatim, "fluency")
                .with(Column::CriterionDefinitionVerbatim, "natural"),
        ]
        .into_iter()
        .collect();

        let rows = year_wise_defined_criteria(&index, 2010);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, "fluency");
        assert_eq!((rows[0].before, rows[0].after), (1, 1));
    }

    #[test]
    fn test_verbatim_definition_presence_keeps_raw_names() {
        let index: RecordIndex = vec![
            row("p1", "2005")
                .with(Column::CriterionVerbatim, "Fluency")
                .with(Column::CriterionDefinitionVerbatim, "reads well"),
            row("p2", "2005").with(Column::CriterionVerbatim, "Fluency"),
            row("p3", "2005").with(Column::CriterionVerbatim, "fluency"),
            row("p4", "2005").with(Column::CriterionVerbatim, "not given"),
        ]
        .into_iter()
        .collect();

        let rows = verbatim_definition_presence(&index);
        assert_eq!(
            rows,
            vec![
                DefinitionPresenceRow {
                    criterion: "Fluency".to_string(),
                    given: 1,
                    not_given: 1
                },
                DefinitionPresenceRow {
                    criterion: "fluency".to_string(),
                    given: 0,
                    not_given: 1
                },
            ]
        );
    }

    #[test]
    fn test_definition_summary_counts_every_row() {
        let index: RecordIndex = vec![
            row("p1", "2005").with(Column::CriterionDefinitionVerbatim, "defined"),
            row("p1", "2005").with(Column::CriterionDefinitionVerbatim, "unclear"),
            row("p2", "2012").with(Column::CriterionDefinitionVerbatim, "defined"),
            row("p3", "2012"),
            row("p4", ""),
        ]
        .into_iter()
        .collect();

        let summary = definition_summary(&index, 2010);
        assert_eq!(summary.given_before, 1);
        assert_eq!(summary.not_given_before, 1);
        assert_eq!(summary.given_after, 1);
        assert_eq!(summary.not_given_after, 1);
        assert_eq!(summary.undated, 1);
        assert_eq!(summary.given_total(), 2);
        assert_eq!(summary.not_given_total(), 2);
    }

    #[test]
    fn test_task_to_criterion_follows_task_order() {
        let index: RecordIndex = vec![
            row("p1", "2005")
                .with(Column::SystemTask, "Dialogue")
                .with(Column::CriterionVerbatim, "Coherence"),
            row("p2", "2005")
                .with(Column::SystemTask, "Summarisation")
                .with(Column::CriterionVerbatim, "Fluency"),
            row("p3", "2005")
                .with(Column::SystemTask, "Multiple (list all): summarisation, dialogue")
                .with(Column::CriterionVerbatim, "fluency"),
            row("p3", "2005")
                .with(Column::SystemTask, "Multiple (list all): summarisation, dialogue")
                .with(Column::CriterionVerbatim, "none given"),
        ]
        .into_iter()
        .collect();

        let task_tally: Tally = ["summarisation", "summarisation", "dialogue"]
            .into_iter()
            .collect();
        let rows = task_to_criterion(&index, &task_tally);
        let flat: Vec<(&str, &str, u64)> = rows
            .iter()
            .map(|r| (r.task.as_str(), r.criterion.as_str(), r.count))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("summarisation", "fluency", 2),
                ("dialogue", "coherence", 1),
                ("dialogue", "fluency", 1),
            ]
        );
    }

    #[test]
    fn test_task_to_standardized_criterion_splits_labels() {
        let index: RecordIndex = vec![row("p1", "2005")
            .with(Column::SystemTask, "Summarisation")
            .with(Column::CriterionParaphrase, "Multiple (list all): 1. Fluency, 2. Clarity")]
        .into_iter()
        .collect();
        let task_tally: Tally = ["summarisation"].into_iter().collect();

        let rows = task_to_standardized_criterion(&index, &task_tally);
        let criteria: Vec<&str> = rows.iter().map(|r| r.criterion.as_str()).collect();
        assert_eq!(criteria, vec!["fluency", "clarity"]);
    }

    #[test]
    fn test_verbatim_to_standardized_mappings() {
        let index: RecordIndex = vec![
            row("p1", "2005")
                .with(Column::CriterionVerbatim, "Readability")
                .with(Column::CriterionParaphrase, "Fluency"),
            row("p2", "2005")
                .with(Column::CriterionVerbatim, "readability")
                .with(Column::CriterionParaphrase, "Multiple (list all): Clarity, Fluency"),
            row("p3", "2005")
                .with(Column::CriterionVerbatim, "unclear")
                .with(Column::CriterionParaphrase, "Fluency"),
        ]
        .into_iter()
        .collect();

        let rows = verbatim_to_standardized(&index);
        assert_eq!(
            rows,
            vec![
                MappingRow {
                    verbatim: "readability".to_string(),
                    standardized: "fluency".to_string(),
                    count: 2
                },
                MappingRow {
                    verbatim: "readability".to_string(),
                    standardized: "clarity".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_specification_frequency() {
        let index: RecordIndex = vec![
            row("p1", "2005")
                .with(Column::CriterionVerbatim, "Fluency")
                .with(Column::CriterionDefinitionVerbatim, "reads well"),
            row("p1", "2005").with(Column::CriterionVerbatim, "Adequacy"),
            row("p2", "2005").with(Column::CriterionVerbatim, "none given"),
        ]
        .into_iter()
        .collect();

        let report = specification_frequency(&index);
        assert_eq!(report.papers.len(), 4);
        assert_eq!(report.papers[0].frequency, Frequency::All);
        assert_eq!(report.papers[1].frequency, Frequency::Some);
        assert_eq!(
            report.criteria,
            FrequencyCounts {
                all: 1,
                some: 0,
                no: 1
            }
        );
        assert_eq!(
            report.definitions,
            FrequencyCounts {
                all: 0,
                some: 1,
                no: 1
            }
        );
    }
}
