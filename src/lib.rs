//! i18n-extract - hardcoded text extractor for Vue single-file components
//!
//! Scans `.vue` components for text in a target script (CJK by default),
//! assigns each text a lookup key, rewrites the quoted literal as a `$t(...)`
//! call and merges the key→text entries into a JSON dictionary.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and validation
//! - `core`: Extraction engine (scan, split, match, name, rewrite, merge)

pub mod cli;
pub mod config;
pub mod core;
