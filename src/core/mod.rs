//! Core extraction engine.
//!
//! A run enumerates component files, splits each into template and script
//! regions, finds translatable spans, names them, rewrites the component and
//! finally folds every entry into the dictionary.
//!
//! ## Module Structure
//!
//! - `scanner`: Component file discovery
//! - `sfc`: Template/script block splitter for `.vue` files
//! - `matcher`: Comment stripping and target-script span matching
//! - `filter`: Exclusion rules
//! - `keygen`: Local and remote key generation
//! - `rewriter`: Quoted-literal rewriting
//! - `dictionary`: Dictionary loading, merging and persisting
//! - `backup`, `run_log`: File backup and the append-only run log
//! - `extractor`: The per-run orchestrator

use std::collections::BTreeMap;

pub mod backup;
pub mod dictionary;
pub mod extractor;
pub mod filter;
pub mod keygen;
pub mod matcher;
pub mod rewriter;
pub mod run_log;
pub mod scanner;
pub mod sfc;

pub use dictionary::{MergeStats, merge_and_persist};
pub use extractor::{ExtractOptions, Extractor, FileError, RunSummary, SpanCounts};
pub use filter::{ExclusionRules, should_translate};
pub use keygen::{KeyGenerator, KeyOutcome, LocalKeyGenerator, RemoteKeyGenerator};
pub use matcher::{Region, RegexSpanMatcher, SpanMatcher, TextSpan};
pub use rewriter::{DocumentRewriter, QuotedLiteralRewriter};
pub use sfc::{SfcDescriptor, parse_sfc};

/// Key→text entries collected during one run.
pub type TranslationMap = BTreeMap<String, String>;
