//! Per-block field extraction.

use subtab_core::{FieldKind, RawBlock};

use crate::patterns::PatternLibrary;

/// Field values found in one block, each borrowed from the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractedFields<'t> {
    pub title: Option<&'t str>,
    pub period_start: Option<&'t str>,
    pub period_end: Option<&'t str>,
    pub amount: Option<&'t str>,
    pub eligibility: Option<&'t str>,
}

impl ExtractedFields<'_> {
    /// Whether any field besides the title resolved.
    #[must_use]
    pub const fn has_details(&self) -> bool {
        self.period_start.is_some()
            || self.period_end.is_some()
            || self.amount.is_some()
            || self.eligibility.is_some()
    }
}

/// Runs every field chain of a [`PatternLibrary`] over a block.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor<'a> {
    library: &'a PatternLibrary,
}

impl<'a> FieldExtractor<'a> {
    #[must_use]
    pub const fn new(library: &'a PatternLibrary) -> Self {
        Self { library }
    }

    /// Resolve each field independently; a missing field never affects the others.
    #[must_use]
    pub fn extract<'t>(&self, block: &RawBlock<'t>) -> ExtractedFields<'t> {
        let resolve = |field: FieldKind| {
            self.library
                .chain(field)
                .first_match(block.text)
                .map(|hit| hit.value)
        };

        ExtractedFields {
            title: resolve(FieldKind::Title),
            period_start: resolve(FieldKind::PeriodStart),
            period_end: resolve(FieldKind::PeriodEnd),
            amount: resolve(FieldKind::Amount),
            eligibility: resolve(FieldKind::Eligibility),
        }
    }
}
