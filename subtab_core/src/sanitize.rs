//! Script stripping for rendered markup.
//!
//! This pass is independent of extraction: callers run it on every string
//! leaving the renderer, whether or not a table was spliced in.

use regex::Regex;
use std::borrow::Cow;

use crate::{Error, Result};

const SCRIPT_PATTERN: &str = r"(?is)<script\b[^>]*>.*?</script\s*>";

/// Removes `<script>…</script>` segments, case-insensitively and non-greedily.
#[derive(Debug, Clone)]
pub struct ScriptStripper {
    re: Regex,
}

impl ScriptStripper {
    pub fn new() -> Result<Self> {
        let re = Regex::new(SCRIPT_PATTERN).map_err(|source| Error::Regex {
            id: "script_strip".to_string(),
            source,
        })?;
        Ok(Self { re })
    }

    /// Strip every script element from `markup`.
    #[must_use]
    pub fn strip<'a>(&self, markup: &'a str) -> Cow<'a, str> {
        self.re.replace_all(markup, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_strips_each_script_separately() {
        let stripper = ScriptStripper::new().expect("script pattern should compile");
        let input = "a<script>x()</script>b<SCRIPT type=\"t\">\ny()\n</Script >c";
        assert_eq!(stripper.strip(input), "abc");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_leaves_clean_markup_borrowed() {
        let stripper = ScriptStripper::new().expect("script pattern should compile");
        let input = "<table><tr><td>補助金</td></tr></table>";
        assert!(matches!(stripper.strip(input), Cow::Borrowed(_)));
    }
}
