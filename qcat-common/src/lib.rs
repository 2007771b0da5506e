//! # qcat Common Library
//!
//! Shared code for the qcat analysis tools including:
//! - Annotation sheet schema (columns, sheet layouts, criterion hierarchy)
//! - Record and record index types
//! - CSV loading of exported annotation sheets
//! - Configuration loading
//! - Text normalization primitives shared by the analyses

pub mod config;
pub mod error;
pub mod index;
pub mod record;
pub mod schema;
pub mod text;

pub use error::{Error, Result};
pub use index::{load_index, LoadOptions, RecordIndex};
pub use record::Record;
pub use schema::{Column, SheetScheme};
