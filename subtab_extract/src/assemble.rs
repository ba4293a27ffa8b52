//! Turning extracted fields into accepted records.

use subtab_core::SubsidyRecord;
use tracing::debug;

use crate::amount::normalize_amount;
use crate::fields::ExtractedFields;

/// Separator placed between a resolved start and end.
pub const PERIOD_SEPARATOR: &str = " 〜 ";

/// Records accepted from one response, in block order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub records: Vec<SubsidyRecord>,
    /// Blocks dropped because no title resolved.
    pub dropped: usize,
}

impl Assembly {
    /// Whether any block produced a record.
    #[must_use]
    pub fn has_matches(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Build a record, or `None` when the block had no title.
#[must_use]
pub fn assemble(fields: &ExtractedFields<'_>) -> Option<SubsidyRecord> {
    let title = fields.title?;

    let period = match (fields.period_start, fields.period_end) {
        (Some(start), Some(end)) => format!("{start}{PERIOD_SEPARATOR}{end}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    };

    Some(SubsidyRecord {
        title: title.to_string(),
        period,
        amount_raw: fields.amount.unwrap_or_default().to_string(),
        amount_normalized: fields.amount.and_then(normalize_amount),
        eligibility: fields.eligibility.unwrap_or_default().to_string(),
    })
}

/// Assemble every block's fields, keeping the accepted ones in order.
#[must_use]
pub fn assemble_all<'t, I>(batch: I) -> Assembly
where
    I: IntoIterator<Item = ExtractedFields<'t>>,
{
    let mut assembly = Assembly::default();

    for fields in batch {
        if let Some(record) = assemble(&fields) {
            assembly.records.push(record);
        } else {
            assembly.dropped += 1;
        }
    }

    if assembly.dropped > 0 {
        debug!("Dropped {} block(s) without a title", assembly.dropped);
    }

    assembly
}
