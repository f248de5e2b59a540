//! Candidate span matching.
//!
//! Comment regions are removed from a block first, then every left-to-right,
//! non-overlapping run of target-script characters is reported.

use std::borrow::Cow;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::{CommentPatterns, Config};

/// The component sub-region a span was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Template,
    Script,
}

/// A run of target-script text found inside a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub region: Region,
}

/// Finds candidate spans in a block of text.
///
/// Implementations hold no state between calls.
pub trait SpanMatcher {
    fn find_spans(&self, block: &str, region: Region) -> Vec<TextSpan>;
}

/// Regex-based matcher driven by the script pattern and comment patterns.
#[derive(Debug, Clone)]
pub struct RegexSpanMatcher {
    script: Regex,
    comments: Vec<Regex>,
}

impl RegexSpanMatcher {
    pub fn new(script_pattern: &str, comment_patterns: &CommentPatterns) -> Result<Self> {
        let script = Regex::new(script_pattern)
            .with_context(|| format!("Invalid script pattern: \"{}\"", script_pattern))?;
        let comments = comment_patterns
            .iter()
            .map(|(field, pattern)| {
                Regex::new(pattern)
                    .with_context(|| format!("Invalid regex in '{}': \"{}\"", field, pattern))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { script, comments })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.script_pattern, &config.comment_patterns)
    }

    /// Remove every comment region from `block`.
    ///
    /// Patterns are applied in order: markup, block, then single-line comments.
    pub fn strip_comments<'a>(&self, block: &'a str) -> Cow<'a, str> {
        let mut stripped = Cow::Borrowed(block);
        for comment in &self.comments {
            if comment.is_match(&stripped) {
                stripped = Cow::Owned(comment.replace_all(&stripped, "").into_owned());
            }
        }
        stripped
    }
}

impl SpanMatcher for RegexSpanMatcher {
    fn find_spans(&self, block: &str, region: Region) -> Vec<TextSpan> {
        let stripped = self.strip_comments(block);
        self.script
            .find_iter(&stripped)
            .map(|m| TextSpan {
                text: m.as_str().to_string(),
                region,
            })
            .collect()
    }
}
