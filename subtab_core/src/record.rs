//! Records, blocks and the vocabulary shared between them.

use serde::{Deserialize, Serialize};

/// The list layout detected for a response, chosen once per input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListStyle {
    /// `1. **Title**` enumerated entries.
    Numbered,
    /// `- **Title**` bullet entries.
    Bulleted,
    /// The response opens with a bare `**Title**`.
    LeadingBold,
    /// No structural marker; the whole response is one block.
    Single,
}

impl ListStyle {
    /// Returns the string representation of this style.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Numbered => "numbered",
            Self::Bulleted => "bulleted",
            Self::LeadingBold => "bold-title",
            Self::Single => "single",
        }
    }
}

/// A contiguous span of the source believed to describe one program.
///
/// `start..end` are byte offsets into the text the block was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'t> {
    pub text: &'t str,
    pub start: usize,
    pub end: usize,
    pub style: ListStyle,
}

impl<'t> RawBlock<'t> {
    /// Cut a block out of `source`.
    ///
    /// Offsets must lie on char boundaries; the segmenter only produces
    /// offsets taken from regex matches, which always do.
    #[must_use]
    pub fn new(source: &'t str, start: usize, end: usize, style: ListStyle) -> Self {
        Self {
            text: &source[start..end],
            start,
            end,
            style,
        }
    }
}

/// The semantic fields a pattern chain can resolve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Title,
    PeriodStart,
    PeriodEnd,
    Amount,
    Eligibility,
}

impl FieldKind {
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::PeriodStart,
        Self::PeriodEnd,
        Self::Amount,
        Self::Eligibility,
    ];

    /// Returns the string representation of this field.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::PeriodStart => "period_start",
            Self::PeriodEnd => "period_end",
            Self::Amount => "amount",
            Self::Eligibility => "eligibility",
        }
    }
}

/// One subsidy program recovered from free text.
///
/// Only `title` is required; every other field is empty (or `None`) when
/// its pattern chain found nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubsidyRecord {
    pub title: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub amount_raw: String,
    #[serde(default)]
    pub amount_normalized: Option<u64>,
    #[serde(default)]
    pub eligibility: String,
}

impl SubsidyRecord {
    /// Create a record carrying only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_serde_names_match_as_str() {
        for kind in FieldKind::ALL {
            let json = serde_json::to_value(kind).ok();
            assert_eq!(json.as_ref().and_then(|v| v.as_str()), Some(kind.as_str()));
        }
    }

    #[test]
    fn test_raw_block_slices_source() {
        let source = "前文\n1. **A**\n本文";
        let start = source.find("1.").unwrap_or_default();
        let block = RawBlock::new(source, start, source.len(), ListStyle::Numbered);
        assert_eq!(block.text, "1. **A**\n本文");
        assert_eq!(block.style.as_str(), "numbered");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_record_defaults_when_deserializing() {
        let record: SubsidyRecord =
            serde_json::from_str(r#"{"title":"IT導入補助金"}"#).expect("title-only JSON should parse");
        assert_eq!(record, SubsidyRecord::titled("IT導入補助金"));
        assert!(record.amount_normalized.is_none());
    }
}
