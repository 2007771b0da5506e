//! Agreement-round sheets
//!
//! Each annotator fills their own copy of the annotation sheet for the same
//! papers. Sheets are numbered 1..=n in the order given and every row keeps
//! the number of the sheet it came from.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use qcat_common::index::read_sheet;
use qcat_common::text::{canonical, standardized_labels};
use qcat_common::{Column, Record, Result, SheetScheme};

/// The labels one sheet gave one paper for one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSet {
    /// Sheet number (1-based)
    pub source: usize,
    /// Paper key
    pub key: String,
    pub labels: BTreeSet<String>,
}

/// Rows from every sheet of an agreement round
#[derive(Debug, Clone, Default)]
pub struct AnnotationTable {
    records: Vec<Record>,
}

impl AnnotationTable {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sheet numbers present in the table, ascending
    pub fn sources(&self) -> Vec<usize> {
        self.records
            .iter()
            .map(|r| r.source)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Group `(source, key)` rows into sets, ordered by source then key
    fn grouped<F, I>(&self, values: F) -> Vec<LabelSet>
    where
        F: Fn(&Record) -> I,
        I: IntoIterator<Item = String>,
    {
        let mut groups: BTreeMap<(usize, String), BTreeSet<String>> = BTreeMap::new();
        for record in &self.records {
            groups
                .entry((record.source, record.key().to_string()))
                .or_default()
                .extend(values(record));
        }
        groups
            .into_iter()
            .map(|((source, key), labels)| LabelSet {
                source,
                key,
                labels,
            })
            .collect()
    }

    /// Distinct cell values of `column` per sheet and paper
    pub fn label_sets(&self, column: Column) -> Vec<LabelSet> {
        self.grouped(|record| std::iter::once(record.get(column).to_string()))
    }

    /// Standardized criteria per sheet and paper, lifted to their top-level
    /// group in `scheme`'s hierarchy
    ///
    /// Labels outside the hierarchy are kept in canonical form.
    pub fn top_level_criteria(&self, scheme: SheetScheme) -> Vec<LabelSet> {
        self.grouped(|record| {
            standardized_labels(record.get(Column::CriterionParaphrase))
                .into_iter()
                .map(|label| match scheme.parent_criterion(&label) {
                    Some(group) => group.to_string(),
                    None => canonical(&label),
                })
                .collect::<Vec<_>>()
        })
    }
}

/// Load one sheet per annotator
///
/// Rows marked for exclusion and rows without a paper key are dropped.
pub fn load_sheets<P: AsRef<Path>>(
    paths: &[P],
    scheme: SheetScheme,
    header_rows: usize,
) -> Result<AnnotationTable> {
    let mut records = Vec::new();

    for (i, path) in paths.iter().enumerate() {
        let source = i + 1;
        let rows = read_sheet(path, scheme, header_rows, source)?;
        let read = rows.len();
        records.extend(
            rows.into_iter()
                .filter(|r| !r.is_excluded() && !r.key().trim().is_empty()),
        );
        debug!(
            source,
            path = %path.as_ref().display(),
            rows = read,
            "Read agreement sheet"
        );
    }

    info!("Loaded {} rows from {} sheets", records.len(), paths.len());
    Ok(AnnotationTable::from_records(records))
}
