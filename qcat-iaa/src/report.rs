//! Agreement report
//!
//! JSON export of an agreement round and the tables printed to the terminal.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use qcat_common::SheetScheme;

use crate::agreement::{ColumnAgreement, PairwiseAgreement};

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Report timestamp (RFC 3339)
    pub timestamp: String,
    pub version: String,
}

/// Results of one agreement round
#[derive(Debug, Clone, Serialize)]
pub struct IaaReport {
    pub session: SessionInfo,
    pub scheme: SheetScheme,
    /// Sheets in source order (source 1 first)
    pub sheets: Vec<PathBuf>,
    /// Rows kept after exclusion
    pub rows: usize,
    pub closed_class: Vec<ColumnAgreement>,
    pub pairwise: Vec<PairwiseAgreement>,
}

impl IaaReport {
    pub fn new(
        scheme: SheetScheme,
        sheets: Vec<PathBuf>,
        rows: usize,
        closed_class: Vec<ColumnAgreement>,
        pairwise: Vec<PairwiseAgreement>,
    ) -> Self {
        Self {
            session: SessionInfo {
                timestamp: chrono::Utc::now().to_rfc3339(),
                version: "1.0".to_string(),
            },
            scheme,
            sheets,
            rows,
            closed_class,
            pairwise,
        }
    }

    /// Export report to a JSON file
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| " n/a".to_string())
}

/// Terminal tables for agreement results
pub struct CliFormatter;

impl CliFormatter {
    /// One line per column: jaccard alpha, MASI alpha
    pub fn format_alpha_table(results: &[ColumnAgreement]) -> String {
        let width = results
            .iter()
            .map(|r| r.column.len())
            .max()
            .unwrap_or(0)
            .max("column".len());

        let mut output = String::new();
        output.push_str(&format!(
            "{:<width$}  alpha_jaccard  alpha_masi\n",
            "column",
            width = width
        ));
        for result in results {
            output.push_str(&format!(
                "{:<width$}  {:>13}  {:>10}\n",
                result.column,
                fmt_value(result.alpha_jaccard),
                fmt_value(result.alpha_masi),
                width = width
            ));
        }
        output
    }

    /// Sheet × sheet matrix with each sheet's mean agreement
    pub fn format_pairwise(pairwise: &PairwiseAgreement) -> String {
        let mut output = format!("Interannotator agreement for {}\n", pairwise.column);

        output.push(' ');
        for source in &pairwise.sources {
            output.push_str(&format!("\t{}", source));
        }
        output.push_str("\tmean\n");

        for (i, source) in pairwise.sources.iter().enumerate() {
            output.push_str(&source.to_string());
            for value in &pairwise.matrix[i] {
                output.push_str(&format!("\t{}", fmt_value(*value)));
            }
            output.push_str(&format!("\t{}\n", fmt_value(pairwise.mean[i])));
        }
        output
    }
}
