//! Record index and sheet loading
//!
//! The record index groups annotation rows by paper key, preserving the
//! order in which papers first appear in the sheet. Every analysis consumes
//! this index; none of them care how it was loaded.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::record::Record;
use crate::schema::{Column, SheetScheme};
use crate::{Error, Result};

/// Key value marking the end of the annotated data in a sheet
pub const END_OF_DOC: &str = "END_OF_DOC";

/// All rows annotated for one paper
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    pub key: String,
    pub rows: Vec<Record>,
}

impl Paper {
    /// First row of the paper; paper-level columns are read from it
    pub fn first(&self) -> &Record {
        // Papers are only created by inserting a row
        &self.rows[0]
    }
}

/// Ordered paper key → rows index
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    papers: Vec<Paper>,
    positions: HashMap<String, usize>,
}

impl RecordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row to its paper, creating the paper on first sight
    pub fn insert(&mut self, record: Record) {
        let key = record.key().to_string();
        match self.positions.get(&key) {
            Some(&pos) => self.papers[pos].rows.push(record),
            None => {
                self.positions.insert(key.clone(), self.papers.len());
                self.papers.push(Paper {
                    key,
                    rows: vec![record],
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Paper> {
        self.positions.get(key).map(|&pos| &self.papers[pos])
    }

    /// Papers in first-seen order
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    /// Number of papers
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Number of rows across all papers
    pub fn total_rows(&self) -> usize {
        self.papers.iter().map(|p| p.rows.len()).sum()
    }

    /// First row of every paper
    pub fn first_rows(&self) -> impl Iterator<Item = &Record> {
        self.papers.iter().map(Paper::first)
    }

    /// Every row of every paper, in index order
    pub fn rows(&self) -> impl Iterator<Item = &Record> {
        self.papers.iter().flat_map(|p| p.rows.iter())
    }
}

impl FromIterator<Record> for RecordIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut index = RecordIndex::new();
        for record in iter {
            index.insert(record);
        }
        index
    }
}

/// Options controlling how an annotation sheet export is read
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub scheme: SheetScheme,
    /// Leading rows to skip (section row and header row)
    pub header_rows: usize,
    /// Annotators whose rows are left out of the index
    pub excluded_annotators: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            scheme: SheetScheme::V2,
            header_rows: 2,
            excluded_annotators: vec!["DG".to_string()],
        }
    }
}

/// Read the data rows of one exported sheet
///
/// Columns are assigned positionally by `scheme`, skipping cells the scheme
/// does not track; short rows are padded with empty cells and surplus cells
/// are ignored. Reading stops at the first row whose key is [`END_OF_DOC`].
pub fn read_sheet<P: AsRef<Path>>(
    path: P,
    scheme: SheetScheme,
    header_rows: usize,
    source: usize,
) -> Result<Vec<Record>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(format!("Sheet export {}", path.display())));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let positions = scheme.positions();
    let mut records = Vec::new();

    for row in reader.records().skip(header_rows) {
        let row = row?;
        let mut record = Record::new(source);
        for &(i, column) in &positions {
            record.set(column, row.get(i).unwrap_or(""));
        }
        if record.key() == END_OF_DOC {
            debug!(path = %path.display(), rows = records.len(), "Reached END_OF_DOC");
            break;
        }
        records.push(record);
    }

    Ok(records)
}

/// Load the corpus sheet export into a record index
///
/// Rows marked for exclusion, rows by excluded annotators, and rows without
/// a paper key are skipped.
pub fn load_index<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<RecordIndex> {
    let path = path.as_ref();
    let records = read_sheet(path, options.scheme, options.header_rows, 0)?;

    let mut index = RecordIndex::new();
    let (mut excluded, mut by_annotator, mut keyless) = (0usize, 0usize, 0usize);

    for record in records {
        if record.is_excluded() {
            excluded += 1;
            continue;
        }
        if options
            .excluded_annotators
            .iter()
            .any(|a| a == record.get(Column::Annotator))
        {
            by_annotator += 1;
            continue;
        }
        if record.key().trim().is_empty() {
            keyless += 1;
            continue;
        }
        index.insert(record);
    }

    debug!(excluded, by_annotator, keyless, "Skipped sheet rows");
    info!(
        "Loaded {} papers ({} rows) from {}",
        index.len(),
        index.total_rows(),
        path.display()
    );

    Ok(index)
}
