//! Vue single-file component splitter.
//!
//! Locates the top-level `<template>` and `<script>` blocks of a `.vue` file.
//! This is a block locator, not an HTML parser: it balances nested `<template>`
//! tags and skips markup comments, nothing more.

use thiserror::Error;

/// The template and script sub-regions of a component: the text between each
/// block's opening and closing tags. Either may be absent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SfcDescriptor<'a> {
    pub template: Option<&'a str>,
    pub script: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SfcError {
    #[error("element is missing end tag: <{0}>")]
    MissingEndTag(String),
    #[error("a single file component can contain only one <{0}> element")]
    Duplicate(&'static str),
}

/// Split component source into its template and script blocks.
///
/// `<script setup>` blocks are not returned as the script region. `<style>` and
/// custom blocks such as `<i18n>` or `<docs>` are skipped over unread.
pub fn parse_sfc(source: &str) -> Result<SfcDescriptor<'_>, SfcError> {
    let mut descriptor = SfcDescriptor::default();
    let mut pos = 0;

    while let Some(rel) = source[pos..].find('<') {
        let start = pos + rel;
        let rest = &source[start..];

        if rest.starts_with("<!--") {
            pos = match rest.find("-->") {
                Some(end) => start + end + 3,
                None => source.len(),
            };
            continue;
        }

        let name = tag_name(&rest[1..]);
        if name.is_empty() {
            pos = start + 1;
            continue;
        }

        let Some(gt) = find_tag_end(source, start + 1 + name.len()) else {
            return Err(SfcError::MissingEndTag(name.to_string()));
        };
        let open_end = gt + 1;
        let attrs = &source[start + 1 + name.len()..gt];

        // Self-closing blocks have no content.
        if attrs.trim_end().ends_with('/') {
            pos = open_end;
            continue;
        }

        let (content_end, close_end) = if name == "template" {
            find_balanced_template_end(source, open_end)?
        } else {
            let close = format!("</{}>", name);
            let end = source[open_end..]
                .find(&close)
                .map(|i| open_end + i)
                .ok_or_else(|| SfcError::MissingEndTag(name.to_string()))?;
            (end, end + close.len())
        };
        let content = &source[open_end..content_end];

        match name {
            "template" => {
                if descriptor.template.is_some() {
                    return Err(SfcError::Duplicate("template"));
                }
                descriptor.template = Some(content);
            }
            "script" if !has_attr(attrs, "setup") => {
                if descriptor.script.is_some() {
                    return Err(SfcError::Duplicate("script"));
                }
                descriptor.script = Some(content);
            }
            _ => {}
        }

        pos = close_end;
    }

    Ok(descriptor)
}

/// Leading tag name of `s`, empty if `s` does not start with one.
fn tag_name(s: &str) -> &str {
    let len = s
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_alphanumeric() || (i > 0 && (c == '-' || c == '_' || c == '.')))
        })
        .map_or(s.len(), |(i, _)| i);
    &s[..len]
}

/// Index of the `>` closing the tag whose attributes start at `from`.
///
/// A `>` inside a quoted attribute value does not end the tag.
fn find_tag_end(source: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in source.as_bytes()[from..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(from + i),
            None => {}
        }
    }
    None
}

/// Finds the `</template>` closing the root template, skipping nested
/// templates and markup comments.
///
/// Returns (content end, position after the closing tag).
fn find_balanced_template_end(source: &str, from: usize) -> Result<(usize, usize), SfcError> {
    const OPEN: &str = "<template";
    const CLOSE: &str = "</template";

    let missing = || SfcError::MissingEndTag("template".to_string());
    let is_boundary =
        |s: &str| s.chars().next().is_some_and(|c| c == '>' || c == '/' || c.is_whitespace());

    let mut depth = 1usize;
    let mut pos = from;

    while let Some(rel) = source[pos..].find('<') {
        let lt = pos + rel;
        let rest = &source[lt..];

        if rest.starts_with("<!--") {
            pos = lt + rest.find("-->").ok_or_else(missing)? + 3;
        } else if rest.starts_with(CLOSE) && is_boundary(&rest[CLOSE.len()..]) {
            let gt = find_tag_end(source, lt + CLOSE.len()).ok_or_else(missing)?;
            depth -= 1;
            if depth == 0 {
                return Ok((lt, gt + 1));
            }
            pos = gt + 1;
        } else if rest.starts_with(OPEN) && is_boundary(&rest[OPEN.len()..]) {
            let gt = find_tag_end(source, lt + OPEN.len()).ok_or_else(missing)?;
            // A self-closing nested template does not change depth.
            if !source[..gt].ends_with('/') {
                depth += 1;
            }
            pos = gt + 1;
        } else {
            pos = lt + 1;
        }
    }

    Err(missing())
}

fn has_attr(attrs: &str, name: &str) -> bool {
    attrs
        .split_whitespace()
        .any(|a| a == name || a.starts_with(&format!("{}=", name)))
}
