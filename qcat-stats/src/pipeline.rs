//! Full corpus report
//!
//! Runs every analysis over a loaded record index and writes the resulting
//! tables and data files into an [`OutputLayout`].

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use qcat_common::config::CorpusConfig;
use qcat_common::{Column, RecordIndex, Result};

use crate::confusion::{build_confusion_indices, confusion_table, ConfusionIndex, ConfusionMode};
use crate::criterion::paraphrase_frequency;
use crate::crosstab::{
    definition_summary, specification_frequency, task_to_criterion,
    task_to_standardized_criterion, verbatim_definition_presence, verbatim_to_standardized,
    year_wise_counts, year_wise_defined_criteria, DefinitionSummary, MappingRow, TaskCriterionRow,
    YearSplitRow,
};
use crate::frequency::{count_all_contents, count_contents, count_empty, unique_count_contents};
use crate::output::{LatexTable, OutputLayout};
use crate::statistics::{normalized_statistics_frequency, statistics_frequency};
use crate::tally::Tally;

/// Options for a report run
#[derive(Debug, Clone)]
pub struct StatsOptions {
    /// Papers published before this year count as "before"
    pub split_year: i32,
    /// Rows kept in confusion tables
    pub top_n: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            split_year: 2010,
            top_n: 10,
        }
    }
}

impl From<&CorpusConfig> for StatsOptions {
    fn from(corpus: &CorpusConfig) -> Self {
        Self {
            split_year: corpus.split_year,
            top_n: corpus.top_n,
        }
    }
}

/// Criteria with more than one counterpart, per confusion index
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfusionSummary {
    pub author: usize,
    pub standardized: usize,
    pub author_normalized: usize,
    pub standardized_normalized: usize,
}

/// What a report run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Run timestamp (RFC 3339)
    pub timestamp: String,
    pub papers: usize,
    pub rows: usize,
    pub split_year: i32,
    pub empty_response_elicitation: usize,
    pub definitions: DefinitionSummary,
    pub confused_criteria: ConfusionSummary,
    pub files_written: Vec<PathBuf>,
}

/// Paper-level frequency tables: (column, file name, table header)
const FREQUENCY_TABLES: &[(Column, &str, &str)] = &[
    (Column::SystemTask, "system_task", "Task"),
    (Column::SystemOutput, "system_output", "Output"),
    (Column::SystemLanguage, "system_language", "Language"),
    (Column::CriterionVerbatim, "criterion_verbatim", "Criterion (author-defined)"),
];

const UNIQUE_TABLES: &[(Column, &str, &str)] = &[
    (Column::SystemTask, "system_unique_task", "Task"),
    (Column::SystemOutput, "system_unique_output", "Output"),
    (Column::SystemInput, "system_unique_input", "Input"),
    (Column::SystemLanguage, "system_unique_language", "Language"),
];

/// Row-level tables with blanks included
const COMPLETE_TABLES: &[(Column, &str, &str)] = &[
    (Column::OpResponseValues, "op_response_values_complete", "Response Values"),
    (Column::OpInstrumentSize, "op_instrument_size_complete", "Instrument Size"),
    (Column::OpInstrumentType, "op_instrument_type_complete", "Instrument Type"),
    (Column::OpDataType, "op_data_type_complete", "Data Type"),
    (Column::OpForm, "op_form_complete", "Form"),
    (
        Column::OpQuestionPromptVerbatim,
        "op_question_prompt_verbatim_complete",
        "Verbatim Question Prompt",
    ),
    (
        Column::OpQuestionPromptParaphrase,
        "op_question_prompt_paraphrase_complete",
        "Paraphrase Question Prompt",
    ),
    (Column::OpStatistics, "op_statistics_complete", "Statistics Name"),
    (Column::CriterionVerbatim, "criterion_verbatim_complete", "Criterion Verbatim"),
    (
        Column::CriterionDefinitionVerbatim,
        "criterion_definition_verbatim_complete",
        "Criterion Definition Verbatim",
    ),
    (Column::CriterionParaphrase, "criterion_paraphrase_complete", "Criterion Paraphrase"),
    (
        Column::CriterionDefinitionParaphrase,
        "criterion_definition_paraphrase_complete",
        "Criterion Definition Paraphrase",
    ),
];

fn year_split_table(rows: &[YearSplitRow], split_year: i32) -> LatexTable {
    let mut table = LatexTable::new([
        "Criterion".to_string(),
        format!("Before {}", split_year),
        format!("After {}", split_year),
        "Total".to_string(),
    ]);
    for row in rows {
        table.push_row(vec![
            row.value.clone().into(),
            row.before.into(),
            row.after.into(),
            row.total.into(),
        ]);
    }
    table
}

fn task_criterion_table(rows: &[TaskCriterionRow], criterion_header: &str) -> LatexTable {
    let mut table = LatexTable::new(["Task", criterion_header, "Count"]);
    for row in rows {
        table.push_row(vec![
            row.task.clone().into(),
            row.criterion.clone().into(),
            row.count.into(),
        ]);
    }
    table
}

fn mapping_table(rows: &[MappingRow]) -> LatexTable {
    let mut table = LatexTable::new(["Verbatim", "Standardised", "Count"]);
    for row in rows {
        table.push_row(vec![
            row.verbatim.clone().into(),
            row.standardized.clone().into(),
            row.count.into(),
        ]);
    }
    table
}

fn confusion_latex(index: &ConfusionIndex, n: usize) -> LatexTable {
    let mut table = LatexTable::new(["Criterion", "Corresponding criteria", "Amount"]);
    for row in confusion_table(index, n) {
        table.push_row(vec![
            row.criterion.into(),
            row.corresponding.join(", ").into(),
            row.amount.into(),
        ]);
    }
    table
}

/// Collects written paths for the run summary
struct Writer<'a> {
    layout: &'a OutputLayout,
    written: Vec<PathBuf>,
}

impl Writer<'_> {
    fn json<T: Serialize>(&mut self, name: &str, value: &T) -> Result<()> {
        self.written.push(self.layout.write_json(name, value)?);
        Ok(())
    }

    fn csv<T: Serialize>(&mut self, name: &str, header: &[&str], rows: &[T]) -> Result<()> {
        self.written.push(self.layout.write_csv(name, header, rows)?);
        Ok(())
    }

    fn table(&mut self, name: &str, table: &LatexTable) -> Result<()> {
        self.written.push(self.layout.write_table(name, table)?);
        Ok(())
    }

    /// Count, percent and JSON outputs of one paper-level tally
    fn frequency(&mut self, name: &str, header: &str, tally: &Tally) -> Result<()> {
        self.json(name, tally)?;
        self.written
            .push(self.layout.write_frequency_table(name, header, tally)?);
        self.written.push(self.layout.write_percent_table(
            &format!("{}_percent", name),
            header,
            tally,
        )?);
        Ok(())
    }
}

/// Run every analysis and write all outputs
pub fn run(index: &RecordIndex, options: &StatsOptions, layout: &OutputLayout) -> Result<RunSummary> {
    info!(
        papers = index.len(),
        rows = index.total_rows(),
        split_year = options.split_year,
        "Computing corpus statistics"
    );
    let mut out = Writer {
        layout,
        written: Vec::new(),
    };

    // Paper-level frequencies
    let task_tally = count_contents(index, Column::SystemTask, false);
    for &(column, name, header) in FREQUENCY_TABLES {
        let tally = if column == Column::SystemTask {
            task_tally.clone()
        } else {
            count_contents(index, column, false)
        };
        out.frequency(name, header, &tally)?;
    }
    out.frequency(
        "criterion_paraphrase",
        "Criterion (standardised)",
        &paraphrase_frequency(index),
    )?;
    out.frequency("op_statistics", "Statistical method", &statistics_frequency(index))?;
    // The normalized statistics have no percent table
    let normalized = normalized_statistics_frequency(index);
    out.json("op_statistics_mod", &normalized)?;
    out.written
        .push(layout.write_frequency_table("op_statistics_mod", "Statistical method", &normalized)?);
    out.frequency(
        "response_elicitation",
        "Response Elicitation",
        &count_contents(index, Column::OpForm, false),
    )?;

    for &(column, name, header) in UNIQUE_TABLES {
        out.written.push(layout.write_frequency_table(
            name,
            header,
            &unique_count_contents(index, column),
        )?);
    }
    for &(column, name, header) in COMPLETE_TABLES {
        out.written.push(layout.write_frequency_table(
            name,
            header,
            &count_all_contents(index, column),
        )?);
    }

    let empty_response_elicitation = count_empty(index, Column::OpForm);
    info!("Papers without response elicitation: {}", empty_response_elicitation);

    // Cross-tabulations
    let split = options.split_year;
    out.table(
        "language_by_year",
        &year_split_table(&year_wise_counts(index, Column::SystemLanguage, split), split),
    )?;
    out.table(
        "task_by_year",
        &year_split_table(&year_wise_counts(index, Column::SystemTask, split), split),
    )?;

    let task_criteria = task_to_criterion(index, &task_tally);
    out.table(
        "task2criterion",
        &task_criterion_table(&task_criteria, "Verbatim Criterion"),
    )?;
    out.csv("task2criterion", &TaskCriterionRow::HEADER, &task_criteria)?;

    let task_standardized = task_to_standardized_criterion(index, &task_tally);
    out.table(
        "task2criterion_standardized",
        &task_criterion_table(&task_standardized, "Standardised Criterion"),
    )?;
    out.csv(
        "task2criterion_standardized",
        &TaskCriterionRow::HEADER,
        &task_standardized,
    )?;

    let mappings = verbatim_to_standardized(index);
    out.table("verbatim2standardised", &mapping_table(&mappings))?;
    out.csv("verbatim_to_standardized", &MappingRow::HEADER, &mappings)?;

    out.table(
        "definition_given_by_year",
        &year_split_table(&year_wise_defined_criteria(index, split), split),
    )?;

    let mut presence = LatexTable::new(["Criterion", "Definitions Given", "Definitions Not Given"]);
    for row in verbatim_definition_presence(index) {
        presence.push_row(vec![row.criterion.into(), row.given.into(), row.not_given.into()]);
    }
    out.table("verbatim_given_or_not", &presence)?;

    let definitions = definition_summary(index, split);
    info!(
        "Definitions given: {} before {}, {} after; not given: {} before, {} after",
        definitions.given_before,
        split,
        definitions.given_after,
        definitions.not_given_before,
        definitions.not_given_after
    );

    out.json("are_definitions_criteria_given", &specification_frequency(index))?;

    // Confusion tables
    let verbatim = build_confusion_indices(index, ConfusionMode::Verbatim);
    let normalized = build_confusion_indices(index, ConfusionMode::Normalized);
    let n = options.top_n;
    out.table("confusion_author_criteria", &confusion_latex(&verbatim.author, n))?;
    out.table(
        "confusion_paraphrased_criteria",
        &confusion_latex(&verbatim.standardized, n),
    )?;
    out.table("confusion_author_criteria_mod", &confusion_latex(&normalized.author, n))?;
    out.table(
        "confusion_paraphrased_criteria_mod",
        &confusion_latex(&normalized.standardized, n),
    )?;

    let confused_criteria = ConfusionSummary {
        author: verbatim.author.confused_count(),
        standardized: verbatim.standardized.confused_count(),
        author_normalized: normalized.author.confused_count(),
        standardized_normalized: normalized.standardized.confused_count(),
    };

    let mut summary = RunSummary {
        timestamp: chrono::Utc::now().to_rfc3339(),
        papers: index.len(),
        rows: index.total_rows(),
        split_year: split,
        empty_response_elicitation,
        definitions,
        confused_criteria,
        files_written: out.written,
    };
    let summary_path = layout.data_dir().join("summary.json");
    summary.files_written.push(summary_path);
    layout.write_json("summary", &summary)?;

    info!("Report complete: {} files written", summary.files_written.len());
    Ok(summary)
}
