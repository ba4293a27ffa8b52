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

//! Shared types for subsidy record tabulation.
//!
//! The extraction engine, configuration layer and command-line caller all
//! speak in terms of the types defined here.

pub mod error;
pub mod record;
pub mod sanitize;
pub mod yen;

pub use error::{Error, Result};
pub use record::{FieldKind, ListStyle, RawBlock, SubsidyRecord};
pub use sanitize::ScriptStripper;
pub use yen::format_yen;
