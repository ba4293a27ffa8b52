//! Configurable field patterns for subsidy record extraction.
//!
//! Each semantic field owns an ordered chain of matchers. Chains are built
//! from plain [`PatternDef`] values so the whole library can be loaded from
//! configuration instead of being hardcoded.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use subtab_core::{Error, FieldKind, Result};

/// How a matched pattern turns into a field value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The first capture group is the value.
    #[default]
    Captured,
    /// The entire match is the value.
    WholeMatch,
}

impl MatchKind {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Captured => "captured",
            Self::WholeMatch => "whole_match",
        }
    }
}

/// Definition of a single field pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternDef {
    /// Unique identifier for this pattern.
    pub id: String,

    /// The field this pattern resolves.
    pub field: FieldKind,

    /// How the match becomes a value.
    #[serde(default)]
    pub kind: MatchKind,

    /// Regex pattern to match block text.
    pub pattern: String,
}

impl PatternDef {
    /// Compile this definition into a matcher.
    ///
    /// # Errors
    /// Returns an error if the regex is invalid, or if a `captured` pattern
    /// has no capture group to read the value from.
    pub fn build(&self) -> Result<Box<dyn FieldMatcher>> {
        let re = Regex::new(&self.pattern).map_err(|source| Error::Regex {
            id: self.id.clone(),
            source,
        })?;

        match self.kind {
            MatchKind::Captured => {
                if re.captures_len() < 2 {
                    return Err(Error::MissingCapture(self.id.clone()));
                }
                Ok(Box::new(CapturedValue {
                    id: self.id.clone(),
                    re,
                }))
            }
            MatchKind::WholeMatch => Ok(Box::new(WholeMatch {
                id: self.id.clone(),
                re,
            })),
        }
    }
}

/// A single recognition rule within a field chain.
pub trait FieldMatcher: fmt::Debug + Send + Sync {
    /// Identifier of the pattern this matcher was built from.
    fn id(&self) -> &str;

    /// Try to pull a value out of `block`. `None` means "no match here".
    fn try_extract<'t>(&self, block: &'t str) -> Option<&'t str>;
}

/// Reads the value from the first capture group.
#[derive(Debug)]
struct CapturedValue {
    id: String,
    re: Regex,
}

impl FieldMatcher for CapturedValue {
    fn id(&self) -> &str {
        &self.id
    }

    fn try_extract<'t>(&self, block: &'t str) -> Option<&'t str> {
        let value = self.re.captures(block)?.get(1)?.as_str();
        non_empty(clean_value(value))
    }
}

/// Uses the whole match, qualifier and unit included.
#[derive(Debug)]
struct WholeMatch {
    id: String,
    re: Regex,
}

impl FieldMatcher for WholeMatch {
    fn id(&self) -> &str {
        &self.id
    }

    fn try_extract<'t>(&self, block: &'t str) -> Option<&'t str> {
        non_empty(clean_value(self.re.find(block)?.as_str()))
    }
}

/// Strip surrounding whitespace and stray bold markers from a value.
fn clean_value(value: &str) -> &str {
    value
        .trim()
        .trim_matches('*')
        .trim()
}

const fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

/// The value a chain resolved, and which pattern produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainHit<'t, 'p> {
    pub value: &'t str,
    pub pattern_id: &'p str,
}

/// Ordered matchers for one field; the first that yields a value wins.
#[derive(Debug)]
pub struct PatternChain {
    field: FieldKind,
    matchers: Vec<Box<dyn FieldMatcher>>,
}

impl PatternChain {
    #[must_use]
    pub fn new(field: FieldKind) -> Self {
        Self {
            field,
            matchers: Vec::new(),
        }
    }

    pub fn push(&mut self, matcher: Box<dyn FieldMatcher>) {
        self.matchers.push(matcher);
    }

    #[must_use]
    pub const fn field(&self) -> FieldKind {
        self.field
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Try each matcher in order and stop at the first hit.
    #[must_use]
    pub fn first_match<'t>(&self, block: &'t str) -> Option<ChainHit<'t, '_>> {
        self.matchers.iter().find_map(|m| {
            m.try_extract(block).map(|value| ChainHit {
                value,
                pattern_id: m.id(),
            })
        })
    }
}

/// Compiled chains for every field.
#[derive(Debug)]
pub struct PatternLibrary {
    title: PatternChain,
    period_start: PatternChain,
    period_end: PatternChain,
    amount: PatternChain,
    eligibility: PatternChain,
}

impl PatternLibrary {
    /// Compile definitions into per-field chains, keeping definition order.
    ///
    /// # Errors
    /// Returns the first compilation error encountered.
    pub fn build(defs: &[PatternDef]) -> Result<Self> {
        let mut library = Self {
            title: PatternChain::new(FieldKind::Title),
            period_start: PatternChain::new(FieldKind::PeriodStart),
            period_end: PatternChain::new(FieldKind::PeriodEnd),
            amount: PatternChain::new(FieldKind::Amount),
            eligibility: PatternChain::new(FieldKind::Eligibility),
        };

        for def in defs {
            let matcher = def.build()?;
            library.chain_mut(def.field).push(matcher);
        }

        Ok(library)
    }

    #[must_use]
    pub const fn chain(&self, field: FieldKind) -> &PatternChain {
        match field {
            FieldKind::Title => &self.title,
            FieldKind::PeriodStart => &self.period_start,
            FieldKind::PeriodEnd => &self.period_end,
            FieldKind::Amount => &self.amount,
            FieldKind::Eligibility => &self.eligibility,
        }
    }

    fn chain_mut(&mut self, field: FieldKind) -> &mut PatternChain {
        match field {
            FieldKind::Title => &mut self.title,
            FieldKind::PeriodStart => &mut self.period_start,
            FieldKind::PeriodEnd => &mut self.period_end,
            FieldKind::Amount => &mut self.amount,
            FieldKind::Eligibility => &mut self.eligibility,
        }
    }
}

/// Default pattern set for Japanese subsidy answers.
///
/// Chains are ordered most specific first. Every labeled field accepts both
/// `：` and `:` and tolerates bold markup around the label.
#[must_use]
pub fn default_patterns() -> Vec<PatternDef> {
    let mut patterns = Vec::new();
    patterns.extend(title_patterns());
    patterns.extend(labeled_chain(
        "period_start",
        FieldKind::PeriodStart,
        &[
            "申請開始日",
            "申請開始",
            "受付開始日",
            "受付開始",
            "公募開始",
            "募集開始",
            "開始日",
            "申請期間",
            "募集期間",
            "公募期間",
            "受付期間",
            "申込期間",
            "application period",
        ],
    ));
    patterns.extend(labeled_chain(
        "period_end",
        FieldKind::PeriodEnd,
        &[
            "申請締切日",
            "申請締切",
            "申請期限",
            "締切日",
            "締切",
            "締め切り",
            "受付終了日",
            "受付終了",
            "公募終了",
            "募集終了",
            "終了日",
            "application deadline",
            "deadline",
        ],
    ));
    patterns.extend(labeled_chain(
        "amount",
        FieldKind::Amount,
        &[
            "補助上限額",
            "補助金上限額",
            "補助上限",
            "上限金額",
            "上限額",
            "最大補助額",
            "補助金額",
            "補助額",
            "助成上限額",
            "助成金額",
            "助成額",
            "支給上限額",
            "支給額",
            "給付額",
            "maximum amount",
        ],
    ));
    patterns.extend(qualified_amount_patterns());
    patterns.extend(labeled_chain(
        "eligibility",
        FieldKind::Eligibility,
        &[
            "対象者",
            "補助対象者",
            "対象事業者",
            "対象企業",
            "対象となる方",
            "申請対象",
            "対象",
            "従業員数",
            "従業員",
            "対象地域",
            "地域",
            "eligibility",
        ],
    ));
    patterns
}

/// Title patterns: numbered marker, bulleted marker, then any bold run.
fn title_patterns() -> Vec<PatternDef> {
    vec![
        PatternDef {
            id: "title_numbered".to_string(),
            field: FieldKind::Title,
            kind: MatchKind::Captured,
            pattern: r"(?m)^[ \t]*\d+[.．][ \t]*\*\*(.+?)\*\*".to_string(),
        },
        PatternDef {
            id: "title_bulleted".to_string(),
            field: FieldKind::Title,
            kind: MatchKind::Captured,
            pattern: r"(?m)^[ \t]*[-•・][ \t]*\*\*(.+?)\*\*".to_string(),
        },
        PatternDef {
            id: "title_bold".to_string(),
            field: FieldKind::Title,
            kind: MatchKind::Captured,
            pattern: r"\*\*(.+?)\*\*".to_string(),
        },
    ]
}

/// Bare `最大` / `上限` qualifiers glued to a yen figure, with no label.
fn qualified_amount_patterns() -> Vec<PatternDef> {
    let number = r"[0-9０-９][0-9０-９,，]*(?:[.．][0-9０-９]+)?[ \t]*(?:億|万)?円";
    ["最大", "上限"]
        .iter()
        .zip(["amount_bare_max", "amount_bare_ceiling"])
        .map(|(qualifier, id)| PatternDef {
            id: id.to_string(),
            field: FieldKind::Amount,
            kind: MatchKind::WholeMatch,
            pattern: format!("{qualifier}[ \\t]*{number}"),
        })
        .collect()
}

/// One captured pattern per label, in the given order.
fn labeled_chain(prefix: &str, field: FieldKind, labels: &[&str]) -> Vec<PatternDef> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| PatternDef {
            id: format!("{prefix}_label_{i}"),
            field,
            kind: MatchKind::Captured,
            pattern: labeled_pattern(label),
        })
        .collect()
}

/// `label：value` up to the end of the line.
#[must_use]
pub fn labeled_pattern(label: &str) -> String {
    format!(
        r"(?i)(?:\*\*)?{}(?:\*\*)?[ \t]*[:：](?:\*\*)?[ \t]*(.+)",
        regex::escape(label)
    )
}

/// Vocabulary whose presence marks a response as subsidy related.
#[must_use]
pub fn default_domain_keywords() -> Vec<String> {
    [
        "補助金", "助成金", "支援金", "給付金", "交付金", "奨励金", "補助事業", "支援事業",
        "支援制度", "subsidy", "subsidies", "grant",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Application-period vocabulary, required only by the strict gate.
#[must_use]
pub fn default_period_keywords() -> Vec<String> {
    [
        "申請期間",
        "募集期間",
        "公募期間",
        "受付期間",
        "締切",
        "締め切り",
        "申請期限",
        "application period",
        "deadline",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Phrases that open the summary paragraph after a program list.
#[must_use]
pub fn default_closing_phrases() -> Vec<String> {
    [
        "これらの補助金",
        "これらの助成金",
        "これらの支援",
        "これらの制度",
        "上記の補助金",
        "上記の助成金",
        "上記の制度",
        "以上が",
        "以上、",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn library() -> PatternLibrary {
        PatternLibrary::build(&default_patterns()).expect("default patterns should build")
    }

    #[test]
    fn test_default_library_has_every_chain() {
        let library = library();
        for field in FieldKind::ALL {
            assert!(!library.chain(field).is_empty(), "{} chain is empty", field.as_str());
        }
        assert_eq!(library.chain(FieldKind::Title).len(), 3);
    }

    #[test]
    fn test_labeled_pattern_accepts_both_colons() {
        let library = library();
        let chain = library.chain(FieldKind::Eligibility);
        assert_eq!(
            chain.first_match("対象者：中小企業").map(|h| h.value),
            Some("中小企業")
        );
        assert_eq!(
            chain.first_match("対象者: 小規模事業者").map(|h| h.value),
            Some("小規模事業者")
        );
    }

    #[test]
    fn test_labeled_pattern_tolerates_bold_label() {
        let library = library();
        let hit = library
            .chain(FieldKind::PeriodStart)
            .first_match("   - **申請期間**：2024年4月1日〜5月31日");
        assert_eq!(hit.map(|h| h.value), Some("2024年4月1日〜5月31日"));
    }

    #[test]
    fn test_chain_order_decides_title() {
        let library = library();
        let hit = library
            .chain(FieldKind::Title)
            .first_match("前置き**強調**\n1. **ものづくり補助金**");
        let hit = hit.map(|h| (h.value, h.pattern_id));
        assert_eq!(hit, Some(("ものづくり補助金", "title_numbered")));
    }

    #[test]
    fn test_bare_qualifier_keeps_whole_match() {
        let library = library();
        let hit = library
            .chain(FieldKind::Amount)
            .first_match("補助は最大 1,000万円 まで");
        assert_eq!(hit.map(|h| h.value), Some("最大 1,000万円"));
    }

    #[test]
    fn test_captured_without_group_is_rejected() {
        let def = PatternDef {
            id: "broken".to_string(),
            field: FieldKind::Amount,
            kind: MatchKind::Captured,
            pattern: r"上限\d+".to_string(),
        };
        assert!(matches!(def.build(), Err(Error::MissingCapture(id)) if id == "broken"));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let def = PatternDef {
            id: "bad".to_string(),
            field: FieldKind::Title,
            kind: MatchKind::WholeMatch,
            pattern: r"(\*\*".to_string(),
        };
        assert!(matches!(def.build(), Err(Error::Regex { .. })));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_pattern_def_serialization() {
        let def = PatternDef {
            id: "amount_bare_max".to_string(),
            field: FieldKind::Amount,
            kind: MatchKind::WholeMatch,
            pattern: "最大".to_string(),
        };

        let json = serde_json::to_string(&def).expect("pattern should serialize");
        assert!(json.contains(r#""kind":"whole_match""#));
        let deserialized: PatternDef =
            serde_json::from_str(&json).expect("valid JSON should deserialize");
        assert_eq!(deserialized, def);
    }

    #[test]
    fn test_match_kind_parses_from_config_names() {
        let kind: Option<MatchKind> = serde_json::from_str("\"whole_match\"").ok();
        assert_eq!(kind, Some(MatchKind::WholeMatch));
        assert_eq!(MatchKind::WholeMatch.as_str(), "whole_match");
        assert!(serde_json::from_str::<MatchKind>("\"partial\"").is_err());
    }
}
