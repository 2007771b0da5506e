//! # qcat Corpus Statistics
//!
//! Frequency tables, cross-tabulations and criterion confusion tables over
//! the annotated corpus of human-evaluation papers.
//!
//! The analyses read a [`qcat_common::RecordIndex`]; [`pipeline::run`] runs
//! all of them and writes LaTeX tables and JSON/CSV data files.

pub mod confusion;
pub mod criterion;
pub mod crosstab;
pub mod frequency;
pub mod output;
pub mod pipeline;
pub mod statistics;
pub mod tally;

pub use output::OutputLayout;
pub use pipeline::{run, RunSummary, StatsOptions};
pub use tally::Tally;
