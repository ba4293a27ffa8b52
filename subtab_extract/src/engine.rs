//! The tabulation engine: response text in, annotated text out.
//!
//! Construction compiles every pattern once. After that, [`TabulationEngine`]
//! holds only immutable state and can be shared freely across threads.

use serde::{Deserialize, Serialize};
use subtab_core::{FieldKind, ListStyle, RawBlock, Result, SubsidyRecord};
use tracing::debug;

use crate::assemble::assemble_all;
use crate::fields::FieldExtractor;
use crate::patterns::{
    PatternDef, PatternLibrary, default_closing_phrases, default_domain_keywords,
    default_patterns, default_period_keywords,
};
use crate::render::{
    ClosingPhrases, SpliceLayout, SplicePoints, TableConfig, TableRenderer, join_segments,
};
use crate::segment::{BlockSegmenter, GateMode, KeywordGate};

/// Configuration for the tabulation engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Field patterns; chain order follows definition order per field.
    pub patterns: Vec<PatternDef>,

    /// Subsidy vocabulary checked by the gate.
    pub domain_keywords: Vec<String>,

    /// Application-period vocabulary, checked only in strict mode.
    pub period_keywords: Vec<String>,

    pub gate: GateMode,

    /// Phrases that open the summary after a program list.
    pub closing_phrases: Vec<String>,

    pub table: TableConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            domain_keywords: default_domain_keywords(),
            period_keywords: default_period_keywords(),
            gate: GateMode::default(),
            closing_phrases: default_closing_phrases(),
            table: TableConfig::default(),
        }
    }
}

/// Structured output of one successful extraction.
///
/// `before` and `after` borrow the untouched prose around the list. In the
/// [`SpliceLayout::Prepend`] layout `before` is empty and `after` is the
/// whole response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult<'t> {
    pub style: ListStyle,
    pub layout: SpliceLayout,
    pub records: Vec<SubsidyRecord>,
    pub before: &'t str,
    pub table: String,
    pub after: &'t str,
}

impl ExtractionResult<'_> {
    /// Leading prose, table and trailing prose joined into one document.
    #[must_use]
    pub fn document(&self) -> String {
        join_segments(&[self.before, &self.table, self.after])
    }
}

/// Extracts subsidy records from a response and splices in a table.
#[derive(Debug)]
pub struct TabulationEngine {
    gate: KeywordGate,
    segmenter: BlockSegmenter,
    library: PatternLibrary,
    closing: ClosingPhrases,
    renderer: TableRenderer,
}

impl TabulationEngine {
    /// Create an engine from configuration.
    ///
    /// # Errors
    /// Returns an error if any pattern fails to compile.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            gate: KeywordGate::new(&config.domain_keywords, &config.period_keywords, config.gate),
            segmenter: BlockSegmenter::new()?,
            library: PatternLibrary::build(&config.patterns)?,
            closing: ClosingPhrases::new(&config.closing_phrases),
            renderer: TableRenderer::new(config.table.clone()),
        })
    }

    /// Create an engine with the default pattern library.
    ///
    /// # Errors
    /// Returns an error if default pattern compilation fails.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&EngineConfig::default())
    }

    #[must_use]
    pub const fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Run the full pipeline over `text`.
    ///
    /// `None` means "no structured data": the gate failed, no title pattern
    /// matched anywhere, or every block lacked a title.
    #[must_use]
    pub fn extract<'t>(&self, text: &'t str) -> Option<ExtractionResult<'t>> {
        if !self.gate.passes(text) {
            debug!("Gate check failed, leaving response untouched");
            return None;
        }

        if self.library.chain(FieldKind::Title).first_match(text).is_none() {
            debug!("No list format detected, leaving response untouched");
            return None;
        }

        let extractor = FieldExtractor::new(&self.library);
        let mut segmentation = self.segmenter.segment(text, |lead| {
            let block = RawBlock::new(lead, 0, lead.len(), ListStyle::LeadingBold);
            extractor.extract(&block).has_details()
        });
        let points = SplicePoints::locate(text, &segmentation.blocks, &self.closing);
        if points.layout == SpliceLayout::Interior {
            segmentation.clip(text, points.after_start);
        }

        let assembly = assemble_all(segmentation.blocks.iter().map(|b| extractor.extract(b)));

        if !assembly.has_matches() {
            debug!("No block yielded a titled record");
            return None;
        }

        debug!(
            "Extracted {} record(s) from {} response",
            assembly.records.len(),
            segmentation.style.as_str()
        );

        let table = self.renderer.render(&assembly.records);

        Some(ExtractionResult {
            style: segmentation.style,
            layout: points.layout,
            records: assembly.records,
            before: &text[..points.before_end],
            table,
            after: &text[points.after_start..],
        })
    }

    /// Return `text` with a records table spliced in, or `text` unchanged
    /// when nothing structured was found.
    #[must_use]
    pub fn annotate(&self, text: &str) -> String {
        self.extract(text)
            .map_or_else(|| text.to_string(), |result| result.document())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TableFormat;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn engine() -> TabulationEngine {
        TabulationEngine::with_defaults().expect("default engine should build")
    }

    #[test]
    fn test_extraction_engine_new() {
        let engine = engine();
        assert_eq!(engine.library().chain(FieldKind::Title).len(), 3);
    }

    #[test]
    fn test_no_keyword_returns_input() {
        let text = "1. **東京観光**\n期間：4月〜6月";
        assert!(engine().extract(text).is_none());
        assert_eq!(engine().annotate(text), text);
    }

    #[test]
    fn test_no_title_anywhere_returns_input() {
        let text = "IT導入補助金の申請期間は4月から6月です。";
        assert_eq!(engine().annotate(text), text);
    }

    #[test]
    fn test_closing_phrase_bounds_trailing_prose() {
        let text = "ご紹介します。\n\n1. **A補助金**\n   - 上限額：100万円\n2. **B補助金**\n   - 上限額：200万円\n\nこれらの補助金は併用できません。";
        let result = engine().extract(text);
        let result = result.as_ref();

        assert_eq!(result.map(|r| r.layout), Some(SpliceLayout::Interior));
        assert_eq!(result.map(|r| r.before), Some("ご紹介します。\n\n"));
        assert_eq!(result.map(|r| r.after), Some("これらの補助金は併用できません。"));
        assert_eq!(
            result.map(|r| r.records.iter().map(|x| x.amount_raw.as_str()).collect::<Vec<_>>()),
            Some(vec!["100万円", "200万円"])
        );
    }

    #[test]
    fn test_missing_closing_phrase_consumes_rest() {
        let text = "1. **A補助金**\n対象：中小企業\n2. **B補助金**\n対象：個人事業主";
        let result = engine().extract(text);
        assert_eq!(result.as_ref().map(|r| r.after), Some(""));
        assert_eq!(result.as_ref().map(|r| r.before), Some(""));
    }

    #[test]
    fn test_markdown_table_config() {
        let config = EngineConfig {
            table: TableConfig {
                format: TableFormat::Markdown,
                empty_cell: "情報なし".to_string(),
            },
            ..EngineConfig::default()
        };
        let engine = TabulationEngine::new(&config);
        let doc = engine
            .map(|e| e.annotate("1. **A補助金**\nx\n2. **B補助金**\ny"))
            .unwrap_or_default();
        assert!(doc.starts_with("| 補助金名 |"));
        assert!(doc.contains("| A補助金 | 情報なし | 情報なし | 情報なし |"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_config_serialization() {
        let config = EngineConfig::default();

        let json = serde_json::to_string(&config).expect("config should serialize");
        let deserialized: EngineConfig =
            serde_json::from_str(&json).expect("valid JSON should deserialize");
        assert_eq!(deserialized, config);

        let partial: EngineConfig =
            serde_json::from_str(r#"{"gate":"strict"}"#).expect("partial JSON should deserialize");
        assert_eq!(partial.gate, GateMode::Strict);
        assert_eq!(partial.patterns, default_patterns());
    }
}
