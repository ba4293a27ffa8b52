//! Gate check and block segmentation.
//!
//! The gate decides whether a response talks about subsidies at all. The
//! segmenter then picks one [`ListStyle`] for the whole response and cuts it
//! into [`RawBlock`]s by byte offset, never copying the source.

use regex::Regex;
use serde::{Deserialize, Serialize};
use subtab_core::{Error, ListStyle, RawBlock, Result};
use tracing::debug;

const NUMBERED_MARKER: &str = r"(?m)^[ \t]*\d+[.．][ \t]*\*\*";
const BULLETED_MARKER: &str = r"(?m)^([ \t]*)[-•・][ \t]*\*\*";
const LEADING_BOLD: &str = r"\A\s*(\*\*)[^\n]+?\*\*";

/// How much vocabulary the gate requires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// A domain keyword is enough.
    #[default]
    Permissive,
    /// A domain keyword and an application-period keyword are both needed.
    Strict,
}

impl GateMode {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
        }
    }
}

/// Keyword precondition for running extraction at all.
#[derive(Debug, Clone)]
pub struct KeywordGate {
    domain: Vec<String>,
    period: Vec<String>,
    mode: GateMode,
}

impl KeywordGate {
    #[must_use]
    pub fn new(domain: &[String], period: &[String], mode: GateMode) -> Self {
        Self {
            domain: domain.iter().map(|k| k.to_lowercase()).collect(),
            period: period.iter().map(|k| k.to_lowercase()).collect(),
            mode,
        }
    }

    /// Whether `text` carries enough subsidy vocabulary to be worth parsing.
    #[must_use]
    pub fn passes(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        let has_any = |keywords: &[String]| keywords.iter().any(|k| lower.contains(k.as_str()));

        match self.mode {
            GateMode::Permissive => has_any(&self.domain),
            GateMode::Strict => has_any(&self.domain) && has_any(&self.period),
        }
    }
}

/// Blocks cut from one response, all sharing one list style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation<'t> {
    pub style: ListStyle,
    pub blocks: Vec<RawBlock<'t>>,
}

impl<'t> Segmentation<'t> {
    /// Byte offset where the first block starts.
    #[must_use]
    pub fn list_start(&self) -> usize {
        self.blocks.first().map_or(0, |b| b.start)
    }

    /// Drop everything from `end` onwards so trailing prose is not mined.
    pub fn clip(&mut self, source: &'t str, end: usize) {
        self.blocks.retain(|b| b.start < end);
        for block in &mut self.blocks {
            if block.end > end {
                *block = RawBlock::new(source, block.start, end, block.style);
            }
        }
    }
}

/// Splits a response into candidate record blocks.
#[derive(Debug, Clone)]
pub struct BlockSegmenter {
    numbered: Regex,
    bulleted: Regex,
    leading_bold: Regex,
}

impl BlockSegmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            numbered: compile("numbered_marker", NUMBERED_MARKER)?,
            bulleted: compile("bulleted_marker", BULLETED_MARKER)?,
            leading_bold: compile("leading_bold", LEADING_BOLD)?,
        })
    }

    /// Pick the list style for `text`.
    ///
    /// Numbered markers beat bulleted markers. A bold title opening the
    /// response only wins over them when the text before the first marker
    /// itself describes a program, as judged by `lead_has_details`; any
    /// other heading is left as prose. With no marker at all, an opening
    /// bold title still selects `LeadingBold`, and otherwise the response
    /// is one block.
    #[must_use]
    pub fn detect_style<F>(&self, text: &str, lead_has_details: F) -> ListStyle
    where
        F: Fn(&str) -> bool,
    {
        let opens_bold = self.leading_bold.is_match(text);
        let markers = self.list_markers(text);

        match markers {
            Some((style, starts)) => {
                let lead = &text[..starts.first().copied().unwrap_or(text.len())];
                if opens_bold && lead_has_details(lead) {
                    ListStyle::LeadingBold
                } else {
                    style
                }
            }
            None if opens_bold => ListStyle::LeadingBold,
            None => ListStyle::Single,
        }
    }

    /// Cut `text` into blocks according to its detected style.
    #[must_use]
    pub fn segment<'t, F>(&self, text: &'t str, lead_has_details: F) -> Segmentation<'t>
    where
        F: Fn(&str) -> bool,
    {
        let style = self.detect_style(text, lead_has_details);

        let blocks = match style {
            ListStyle::Numbered | ListStyle::Bulleted => self
                .list_markers(text)
                .map(|(style, starts)| split_at(text, &starts, style))
                .unwrap_or_default(),
            ListStyle::LeadingBold => self.split_leading_bold(text),
            ListStyle::Single => vec![RawBlock::new(text, 0, text.len(), style)],
        };

        debug!(
            "Segmented response as {} into {} block(s)",
            style.as_str(),
            blocks.len()
        );

        Segmentation { style, blocks }
    }

    /// Entry offsets of the highest-priority list style present in `text`.
    fn list_markers(&self, text: &str) -> Option<(ListStyle, Vec<usize>)> {
        let numbered: Vec<usize> = self.numbered.find_iter(text).map(|m| m.start()).collect();
        if !numbered.is_empty() {
            return Some((ListStyle::Numbered, numbered));
        }

        let bulleted = self.bullet_starts(text);
        (!bulleted.is_empty()).then_some((ListStyle::Bulleted, bulleted))
    }

    /// Bullet entries at the shallowest indentation used in `text`.
    ///
    /// Deeper bullets are sub-items of the entry above them.
    fn bullet_starts(&self, text: &str) -> Vec<usize> {
        let markers: Vec<(usize, usize)> = self
            .bulleted
            .captures_iter(text)
            .filter_map(|caps| {
                let indent = caps.get(1)?;
                Some((indent.start(), indent.as_str().len()))
            })
            .collect();

        let Some(depth) = markers.iter().map(|&(_, depth)| depth).min() else {
            return Vec::new();
        };

        markers
            .into_iter()
            .filter(|&(_, d)| d == depth)
            .map(|(start, _)| start)
            .collect()
    }

    /// The leading block runs up to the first list entry; the entries after
    /// it become blocks of their own.
    fn split_leading_bold<'t>(&self, text: &'t str) -> Vec<RawBlock<'t>> {
        let start = self
            .leading_bold
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map_or(0, |m| m.start());

        let mut entries = self
            .list_markers(text)
            .map(|(style, starts)| split_at(text, &starts, style))
            .unwrap_or_default();
        let lead_end = entries.first().map_or(text.len(), |b| b.start);

        let mut blocks = vec![RawBlock::new(text, start, lead_end, ListStyle::LeadingBold)];
        blocks.append(&mut entries);
        blocks
    }
}

/// One block per entry, each ending where the next begins.
fn split_at<'t>(text: &'t str, starts: &[usize], style: ListStyle) -> Vec<RawBlock<'t>> {
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            RawBlock::new(text, start, end, style)
        })
        .collect()
}

fn compile(id: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::Regex {
        id: id.to_string(),
        source,
    })
}
