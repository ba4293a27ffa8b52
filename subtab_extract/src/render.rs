//! Table rendering and splicing the table back into the response.
//!
//! Splicing works purely on byte offsets into the original response: the
//! leading prose is `text[..before_end]`, the trailing prose is
//! `text[after_start..]`, and everything in between is replaced by the table.

use serde::{Deserialize, Serialize};
use std::fmt::Write;
use subtab_core::{RawBlock, SubsidyRecord};

/// Column headers: program name, application period, maximum amount,
/// eligible applicants / headcount.
pub const HEADERS: [&str; 4] = ["補助金名", "申請期間", "上限額", "対象者・従業員数"];

/// Markup used for the rendered table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    #[default]
    Html,
    Markdown,
}

impl TableFormat {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
        }
    }
}

/// Table rendering options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    pub format: TableFormat,
    /// Shown in cells whose field did not resolve.
    pub empty_cell: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            format: TableFormat::Html,
            empty_cell: "-".to_string(),
        }
    }
}

/// Renders accepted records as a four-column table.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    config: TableConfig,
}

impl TableRenderer {
    #[must_use]
    pub const fn new(config: TableConfig) -> Self {
        Self { config }
    }

    /// One row per record, in the order given. The amount column shows the
    /// raw text, not the normalized figure.
    #[must_use]
    pub fn render(&self, records: &[SubsidyRecord]) -> String {
        match self.config.format {
            TableFormat::Html => self.render_html(records),
            TableFormat::Markdown => self.render_markdown(records),
        }
    }

    fn cells<'r>(&'r self, record: &'r SubsidyRecord) -> [&'r str; 4] {
        [
            record.title.as_str(),
            record.period.as_str(),
            record.amount_raw.as_str(),
            record.eligibility.as_str(),
        ]
        .map(|cell| if cell.is_empty() { self.config.empty_cell.as_str() } else { cell })
    }

    fn render_html(&self, records: &[SubsidyRecord]) -> String {
        let mut out = String::from("<table class=\"subsidy-table\">\n<thead>\n<tr>");
        for header in HEADERS {
            let _ = write!(out, "<th>{header}</th>");
        }
        out.push_str("</tr>\n</thead>\n<tbody>\n");

        for record in records {
            out.push_str("<tr>");
            for cell in self.cells(record) {
                let _ = write!(out, "<td>{}</td>", escape_html(cell));
            }
            out.push_str("</tr>\n");
        }

        out.push_str("</tbody>\n</table>\n");
        out
    }

    fn render_markdown(&self, records: &[SubsidyRecord]) -> String {
        let mut out = format!("| {} |\n", HEADERS.join(" | "));
        out.push_str("| --- | --- | --- | --- |\n");

        for record in records {
            let row: Vec<String> = self
                .cells(record)
                .iter()
                .map(|cell| cell.replace('|', "\\|"))
                .collect();
            let _ = writeln!(out, "| {} |", row.join(" | "));
        }

        out
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Phrases that open the summary paragraph following the list.
#[derive(Debug, Clone)]
pub struct ClosingPhrases {
    phrases: Vec<String>,
}

impl ClosingPhrases {
    #[must_use]
    pub fn new(phrases: &[String]) -> Self {
        Self {
            phrases: phrases.iter().filter(|p| !p.is_empty()).cloned().collect(),
        }
    }

    /// Earliest offset at or after `from` where a phrase opens a sentence or
    /// clause.
    ///
    /// The phrase must follow a line break, whitespace or punctuation, so
    /// `なお、これらの補助金は` is found while `20名以上、` inside an
    /// eligibility line is not mistaken for `以上、` opening a summary.
    #[must_use]
    pub fn find(&self, text: &str, from: usize) -> Option<usize> {
        let haystack = text.get(from..)?;

        self.phrases
            .iter()
            .filter_map(|phrase| {
                haystack
                    .match_indices(phrase.as_str())
                    .map(|(i, _)| from + i)
                    .find(|&i| opens_clause(text, i))
            })
            .min()
    }
}

fn opens_clause(text: &str, index: usize) -> bool {
    text[..index].chars().next_back().is_none_or(|c| {
        c.is_whitespace()
            || matches!(
                c,
                '。' | '、' | '．' | '，' | '.' | ',' | '!' | '?' | '！' | '？' | '」' | '）' | ')'
            )
    })
}

/// Where the table replaces the list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpliceLayout {
    /// Leading prose, table, trailing prose.
    Interior,
    /// Table followed by the whole original response.
    Prepend,
}

/// Byte offsets delimiting the consumed list region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplicePoints {
    pub before_end: usize,
    pub after_start: usize,
    pub layout: SpliceLayout,
}

impl SplicePoints {
    /// Locate the splice boundaries for `blocks` cut from `text`.
    ///
    /// A single block has no reliable interior boundary, so the table goes
    /// in front of the untouched response.
    #[must_use]
    pub fn locate(text: &str, blocks: &[RawBlock<'_>], closing: &ClosingPhrases) -> Self {
        if blocks.len() <= 1 {
            return Self {
                before_end: 0,
                after_start: 0,
                layout: SpliceLayout::Prepend,
            };
        }

        let before_end = blocks.first().map_or(0, |b| b.start);
        let after_start = closing
            .find(text, before_end)
            .map_or(text.len(), |at| summary_start(text, before_end, at));

        Self {
            before_end,
            after_start,
            layout: SpliceLayout::Interior,
        }
    }
}

/// Widen a closing phrase found mid-line to the start of its line, so a lead-in
/// such as `なお、` stays with the summary. Lines that carry a label, a bold
/// title or a list marker belong to a record and are not widened.
fn summary_start(text: &str, floor: usize, at: usize) -> usize {
    let line_start = text[..at].rfind('\n').map_or(0, |i| i + 1);
    if line_start < floor {
        return at;
    }

    let prefix = text[line_start..at].trim_start();
    let in_record = prefix.contains([':', '：'])
        || prefix.contains("**")
        || prefix.starts_with(|c: char| matches!(c, '-' | '•' | '・') || c.is_ascii_digit());

    if in_record { at } else { line_start }
}

/// Join segments with a single line break between them, skipping blank ones.
///
/// Segments keep their own text verbatim; a newline is only inserted where
/// the previous segment does not already end with one.
#[must_use]
pub fn join_segments(segments: &[&str]) -> String {
    let mut out = String::with_capacity(segments.iter().map(|s| s.len() + 1).sum());

    for segment in segments.iter().filter(|s| !s.trim().is_empty()) {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(segment);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::default_closing_phrases;
    use subtab_core::ListStyle;

    fn records() -> Vec<SubsidyRecord> {
        vec![
            SubsidyRecord {
                title: "A<補助金>".to_string(),
                period: "4月〜6月".to_string(),
                amount_raw: "500万円".to_string(),
                amount_normalized: Some(5_000_000),
                eligibility: String::new(),
            },
            SubsidyRecord::titled("B|助成金"),
        ]
    }

    #[test]
    fn test_html_rows_in_order_and_escaped() {
        let html = TableRenderer::new(TableConfig::default()).render(&records());
        assert!(html.starts_with("<table class=\"subsidy-table\">"));
        assert!(html.contains("<th>補助金名</th><th>申請期間</th><th>上限額</th><th>対象者・従業員数</th>"));
        assert!(html.contains("<tr><td>A&lt;補助金&gt;</td><td>4月〜6月</td><td>500万円</td><td>-</td></tr>"));
        assert_eq!(html.matches("<tr><td>").count(), 2);
        let a = html.find("A&lt;").unwrap_or(usize::MAX);
        let b = html.find("B|").unwrap_or(0);
        assert!(a < b);
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let config = TableConfig {
            format: TableFormat::Markdown,
            empty_cell: String::new(),
        };
        let md = TableRenderer::new(config).render(&records());
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines[0], "| 補助金名 | 申請期間 | 上限額 | 対象者・従業員数 |");
        assert_eq!(lines[3], "| B\\|助成金 |  |  |  |");
    }

    #[test]
    fn test_closing_phrase_needs_clause_boundary() {
        let closing = ClosingPhrases::new(&default_closing_phrases());
        let text = "1. **A**\n対象：20名以上、製造業\n以上、ご参考まで。";
        let found = closing.find(text, 0);
        assert_eq!(found, text.find("以上、ご参考"));
    }

    #[test]
    fn test_closing_phrase_mid_line_after_punctuation() {
        let closing = ClosingPhrases::new(&default_closing_phrases());
        let text = "1. **A補助金**\n上限額：100万円\n\nなお、これらの補助金は併用できません。";
        assert_eq!(closing.find(text, 0), text.find("これらの補助金"));
    }

    #[test]
    fn test_closing_phrase_absent() {
        let closing = ClosingPhrases::new(&default_closing_phrases());
        assert_eq!(closing.find("1. **A**\n詳細", 0), None);
    }

    #[test]
    fn test_locate_interior_boundaries() {
        let text = "前文\n1. **A**\na\n2. **B**\nb\nこれらの補助金をご検討ください。";
        let a = text.find("1.").unwrap_or_default();
        let b = text.find("2.").unwrap_or_default();
        let blocks = [
            RawBlock::new(text, a, b, ListStyle::Numbered),
            RawBlock::new(text, b, text.len(), ListStyle::Numbered),
        ];
        let closing = ClosingPhrases::new(&default_closing_phrases());
        let points = SplicePoints::locate(text, &blocks, &closing);

        assert_eq!(points.layout, SpliceLayout::Interior);
        assert_eq!(&text[..points.before_end], "前文\n");
        assert_eq!(&text[points.after_start..], "これらの補助金をご検討ください。");
    }

    #[test]
    fn test_locate_keeps_lead_in_of_mid_line_summary() {
        let text = "ご紹介します。\n1. **A補助金**\n上限額：100万円\n2. **B補助金**\n上限額：200万円\n\nなお、これらの補助金は併用できません。";
        let a = text.find("1.").unwrap_or_default();
        let b = text.find("2.").unwrap_or_default();
        let blocks = [
            RawBlock::new(text, a, b, ListStyle::Numbered),
            RawBlock::new(text, b, text.len(), ListStyle::Numbered),
        ];
        let closing = ClosingPhrases::new(&default_closing_phrases());
        let points = SplicePoints::locate(text, &blocks, &closing);

        assert_eq!(&text[points.after_start..], "なお、これらの補助金は併用できません。");
    }

    #[test]
    fn test_locate_does_not_widen_into_record_line() {
        let text = "1. **A補助金**\nx\n2. **B補助金**\n備考：要確認。これらの補助金は併用不可です。";
        let a = text.find("1.").unwrap_or_default();
        let b = text.find("2.").unwrap_or_default();
        let blocks = [
            RawBlock::new(text, a, b, ListStyle::Numbered),
            RawBlock::new(text, b, text.len(), ListStyle::Numbered),
        ];
        let closing = ClosingPhrases::new(&default_closing_phrases());
        let points = SplicePoints::locate(text, &blocks, &closing);

        assert_eq!(&text[points.after_start..], "これらの補助金は併用不可です。");
    }

    #[test]
    fn test_join_skips_blank_segments() {
        assert_eq!(join_segments(&["前文\n", "<table/>\n", ""]), "前文\n<table/>\n");
        assert_eq!(join_segments(&["", "T", "後文"]), "T\n後文");
        assert_eq!(join_segments(&["  \n", "T\n", "後文"]), "T\n後文");
    }
}
