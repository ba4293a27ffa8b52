#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Subsidy record extraction and tabulation.
//!
//! Turns a free-form assistant answer describing grant programs into
//! [`SubsidyRecord`](subtab_core::SubsidyRecord)s and splices a table of them
//! back into the answer. Best effort throughout: anything that does not
//! look like a program list comes back unchanged.

pub mod amount;
pub mod assemble;
pub mod engine;
pub mod fields;
pub mod patterns;
pub mod render;
pub mod segment;

pub use amount::normalize_amount;
pub use assemble::{Assembly, assemble, assemble_all};
pub use engine::{EngineConfig, ExtractionResult, TabulationEngine};
pub use fields::{ExtractedFields, FieldExtractor};
pub use patterns::{
    FieldMatcher, MatchKind, PatternChain, PatternDef, PatternLibrary, default_patterns,
};
pub use render::{SpliceLayout, TableConfig, TableFormat, TableRenderer};
pub use segment::{BlockSegmenter, GateMode, KeywordGate, Segmentation};
