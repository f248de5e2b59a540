//! Exclusion rules deciding whether a span is translated.

use anyhow::{Context, Result};
use regex::Regex;

/// A compiled set of exclusion rules, each matched against the whole span.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    rules: Vec<Regex>,
}

impl ExclusionRules {
    /// Compile `patterns`, anchoring each so that it must match the entire span.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let rules = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(&format!("^(?:{})$", p))
                    .with_context(|| format!("Invalid exclude pattern: \"{}\"", p))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns true if any rule matches the whole span.
    pub fn excludes(&self, span: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(span))
    }
}

/// A span is translated unless an exclusion rule matches all of it.
pub fn should_translate(span: &str, rules: &ExclusionRules) -> bool {
    !rules.excludes(span)
}
