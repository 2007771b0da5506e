//! Annotation records
//!
//! One record is one row of an annotation sheet: a single (paper, criterion)
//! annotation. Papers that evaluate several criteria span several rows.

use std::collections::HashMap;

use crate::schema::Column;

/// A single annotation sheet row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Sheet the row was read from (1-based; 0 when not applicable)
    pub source: usize,
    values: HashMap<Column, String>,
}

impl Record {
    /// Create an empty record read from `source`
    pub fn new(source: usize) -> Self {
        Self {
            source,
            values: HashMap::new(),
        }
    }

    /// Builder-style setter
    pub fn with(mut self, column: Column, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        self.values.insert(column, value.into());
    }

    /// Cell value; absent cells read as the empty string
    pub fn get(&self, column: Column) -> &str {
        self.values.get(&column).map(String::as_str).unwrap_or("")
    }

    /// Paper key
    pub fn key(&self) -> &str {
        self.get(Column::Key)
    }

    /// Publication year
    ///
    /// Accepts plain integers and spreadsheet float renderings (`2015.0`).
    pub fn pub_year(&self) -> Option<i32> {
        let raw = self.get(Column::PubYear).trim();
        if raw.is_empty() {
            return None;
        }
        raw.parse::<i32>().ok().or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|y| y.is_finite() && y.fract() == 0.0)
                .map(|y| y as i32)
        })
    }

    /// Whether the annotator marked this row for exclusion
    pub fn is_excluded(&self) -> bool {
        self.get(Column::Exclude) == "TRUE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_cells_are_empty() {
        let record = Record::new(1).with(Column::Key, "paper-1");
        assert_eq!(record.key(), "paper-1");
        assert_eq!(record.get(Column::CriterionVerbatim), "");
    }

    #[test]
    fn test_pub_year_parsing() {
        let year = |raw: &str| Record::default().with(Column::PubYear, raw).pub_year();
        assert_eq!(year("2015"), Some(2015));
        assert_eq!(year(" 2008 "), Some(2008));
        assert_eq!(year("2015.0"), Some(2015));
        assert_eq!(year("2015.5"), None);
        assert_eq!(year(""), None);
        assert_eq!(year("n/a"), None);
    }

    #[test]
    fn test_exclude_flag_is_exact() {
        assert!(Record::default().with(Column::Exclude, "TRUE").is_excluded());
        assert!(!Record::default().with(Column::Exclude, "true").is_excluded());
        assert!(!Record::default().is_excluded());
    }
}
