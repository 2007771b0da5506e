//! Report output
//!
//! Tables go to `<out>/Tables` as LaTeX (booktabs) fragments ready to be
//! `\input` into the paper; machine-readable data goes to `<out>/Data` as
//! JSON or CSV.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use qcat_common::{Error, Result};

use crate::tally::Tally;

/// One table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(u64),
    Float(f64),
}

impl Cell {
    fn is_numeric(&self) -> bool {
        !matches!(self, Cell::Text(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", escape_latex(s)),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<u64> for Cell {
    fn from(n: u64) -> Self {
        Cell::Int(n)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Int(n as u64)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Float(x)
    }
}

/// Escape characters with special meaning in LaTeX
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '^' => escaped.push_str(r"\textasciicircum{}"),
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '<' => escaped.push_str(r"\textless{}"),
            '>' => escaped.push_str(r"\textgreater{}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A LaTeX booktabs tabular
#[derive(Debug, Clone, Default)]
pub struct LatexTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl LatexTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing trailing cells render empty
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column alignment: `r` when every cell is numeric, else `l`
    fn alignment(&self) -> String {
        (0..self.headers.len())
            .map(|col| {
                let numeric = !self.rows.is_empty()
                    && self
                        .rows
                        .iter()
                        .all(|row| row.get(col).map(Cell::is_numeric).unwrap_or(false));
                if numeric {
                    'r'
                } else {
                    'l'
                }
            })
            .collect()
    }

    /// Render the table as a LaTeX fragment
    pub fn render(&self) -> String {
        let header: Vec<String> = self.headers.iter().map(|h| escape_latex(h)).collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                (0..self.headers.len())
                    .map(|col| row.get(col).map(ToString::to_string).unwrap_or_default())
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                body.iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header[col].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
                .collect();
            format!(" {} \\\\\n", padded.join(" & "))
        };

        let mut out = String::new();
        out.push_str(&format!("\\begin{{tabular}}{{{}}}\n", self.alignment()));
        out.push_str("\\toprule\n");
        out.push_str(&line(&header));
        out.push_str("\\midrule\n");
        for row in &body {
            out.push_str(&line(row));
        }
        out.push_str("\\bottomrule\n");
        out.push_str("\\end{tabular}\n");
        out
    }
}

/// Output directory layout of a report run
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("Data")
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.root.join("Tables")
    }

    fn data_file(&self, name: &str) -> Result<PathBuf> {
        let dir = self.data_dir();
        fs::create_dir_all(&dir)?;
        Ok(dir.join(name))
    }

    fn table_file(&self, name: &str) -> Result<PathBuf> {
        let dir = self.tables_dir();
        fs::create_dir_all(&dir)?;
        Ok(dir.join(format!("{}.tex", name)))
    }

    /// Write `value` as pretty JSON to `Data/<name>.json`
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.data_file(&format!("{}.json", name))?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)?;
        info!("Wrote {}", path.display());
        Ok(path)
    }

    /// Write serializable rows to `Data/<name>.csv`, header from field names
    ///
    /// `header` must match the field names of `T`; it is only written
    /// directly when there are no rows to take it from.
    pub fn write_csv<T: Serialize>(
        &self,
        name: &str,
        header: &[&str],
        rows: &[T],
    ) -> Result<PathBuf> {
        let path = self.data_file(&format!("{}.csv", name))?;
        let mut writer = csv::Writer::from_path(&path)?;
        if rows.is_empty() {
            writer.write_record(header)?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        info!("Wrote {}", path.display());
        Ok(path)
    }

    /// Write a table to `Tables/<name>.tex`
    pub fn write_table(&self, name: &str, table: &LatexTable) -> Result<PathBuf> {
        if table.headers.is_empty() {
            return Err(Error::InvalidInput(format!("Table {} has no columns", name)));
        }
        let path = self.table_file(name)?;
        fs::write(&path, table.render())?;
        info!("Wrote {}", path.display());
        Ok(path)
    }

    /// Value / count table in most-common order
    pub fn write_frequency_table(
        &self,
        name: &str,
        header: &str,
        tally: &Tally,
    ) -> Result<PathBuf> {
        self.write_table(name, &frequency_table(header, tally))
    }

    /// Value / percent table in most-common order
    pub fn write_percent_table(&self, name: &str, header: &str, tally: &Tally) -> Result<PathBuf> {
        let mut table = LatexTable::new([header, "Percent"]);
        for (value, percent) in tally.percentages() {
            table.push_row(vec![value.into(), percent.into()]);
        }
        self.write_table(name, &table)
    }
}

/// Build a value / count table in most-common order
pub fn frequency_table(header: &str, tally: &Tally) -> LatexTable {
    let mut table = LatexTable::new([header, "Amount"]);
    for (value, count) in tally.most_common() {
        table.push_row(vec![value.into(), count.into()]);
    }
    table
}
