//! Document rewriting.
//!
//! Replaces quoted occurrences of extracted text with translation calls:
//! `"你好"` becomes `"$t('key')"` and `'你好'` becomes `this.$t('key')`.
//! Substitution is literal and document-wide, not limited to the spans that
//! were matched.

use crate::config::Config;

use super::TranslationMap;

pub trait DocumentRewriter {
    /// Produce the rewritten document. Text outside replaced literals is kept
    /// byte for byte.
    fn rewrite(&self, content: &str, translations: &TranslationMap) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedLiteralRewriter {
    call_name: String,
    receiver: String,
}

impl Default for QuotedLiteralRewriter {
    fn default() -> Self {
        Self::new("$t", "this")
    }
}

impl QuotedLiteralRewriter {
    pub fn new(call_name: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self {
            call_name: call_name.into(),
            receiver: receiver.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.call_name, &config.receiver)
    }

    /// Replacement for a double-quoted literal, quotes included.
    pub fn double_quoted_call(&self, key: &str) -> String {
        format!("\"{}('{}')\"", self.call_name, key)
    }

    /// Replacement for a single-quoted literal, quotes consumed.
    pub fn member_call(&self, key: &str) -> String {
        format!("{}.{}('{}')", self.receiver, self.call_name, key)
    }
}

/// Entries ordered longest text first, ties broken by key.
fn substitution_order(translations: &TranslationMap) -> Vec<(&str, &str)> {
    let mut entries: Vec<(&str, &str)> = translations
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(key, text)| (key.as_str(), text.as_str()))
        .collect();
    entries.sort_by(|(ka, ta), (kb, tb)| tb.len().cmp(&ta.len()).then_with(|| ka.cmp(kb)));
    entries
}

impl DocumentRewriter for QuotedLiteralRewriter {
    fn rewrite(&self, content: &str, translations: &TranslationMap) -> String {
        let mut rewritten = content.to_string();

        for (key, text) in substitution_order(translations) {
            let double_quoted = format!("\"{}\"", text);
            if rewritten.contains(&double_quoted) {
                rewritten = rewritten.replace(&double_quoted, &self.double_quoted_call(key));
            }

            let single_quoted = format!("'{}'", text);
            if rewritten.contains(&single_quoted) {
                rewritten = rewritten.replace(&single_quoted, &self.member_call(key));
            }
        }

        rewritten
    }
}
