//! # qcat Inter-Annotator Agreement
//!
//! Agreement between annotators who annotated the same papers in separate
//! copies of the annotation sheet:
//! - Krippendorff's alpha per closed-class column, under Jaccard and MASI
//!   set distances
//! - Pairwise absolute agreement between sheets

pub mod agreement;
pub mod distance;
pub mod loader;
pub mod report;

pub use agreement::{closed_class_agreement, krippendorff_alpha, pairwise_agreement};
pub use distance::{jaccard_distance, masi_distance};
pub use loader::{load_sheets, AnnotationTable, LabelSet};
pub use report::{CliFormatter, IaaReport};
