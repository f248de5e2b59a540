//! Per-run extraction orchestrator.
//!
//! Files are processed one at a time. Each file extracts into a staged copy of
//! the run map, and the staged copy replaces the run map only once the file has
//! been written back, so a file that fails part-way contributes nothing.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::fs;

use super::{
    TranslationMap,
    backup::backup_file,
    dictionary::{MergeStats, merge_and_persist},
    filter::{ExclusionRules, should_translate},
    keygen::KeyGenerator,
    matcher::{Region, RegexSpanMatcher, SpanMatcher},
    rewriter::{DocumentRewriter, QuotedLiteralRewriter},
    run_log::RunLog,
    scanner::scan_files,
    sfc::parse_sfc,
};
use crate::config::Config;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Extract and report without writing components, backups, logs or the dictionary.
    pub dry_run: bool,
    pub verbose: bool,
}

/// A file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// Spans that passed the filter, per region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanCounts {
    pub template: usize,
    pub script: usize,
}

impl SpanCounts {
    fn record(&mut self, region: Region) {
        match region {
            Region::Template => self.template += 1,
            Region::Script => self.script += 1,
        }
    }

    fn add(&mut self, other: SpanCounts) {
        self.template += other.template;
        self.script += other.script;
    }

    pub fn total(&self) -> usize {
        self.template + self.script
    }
}

/// What a successfully processed file contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FileChange {
    spans: SpanCounts,
    rewritten: bool,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Component files found by the scan.
    pub files_found: usize,
    /// Files that were read, extracted and written back (or left unchanged).
    pub processed_files: Vec<PathBuf>,
    /// Files whose content changed.
    pub rewritten_files: Vec<PathBuf>,
    /// Spans that passed the filter across all processed files.
    pub spans: SpanCounts,
    /// The run's key→text entries.
    pub translations: TranslationMap,
    pub file_errors: Vec<FileError>,
    /// Merge counts, `None` on a dry run.
    pub dictionary: Option<MergeStats>,
    pub dictionary_path: PathBuf,
    pub skipped_paths: usize,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn processed_count(&self) -> usize {
        self.processed_files.len()
    }

    pub fn extracted_count(&self) -> usize {
        self.translations.len()
    }
}

/// Mutable state of one run. Created by [`Extractor::run`] and dropped with it.
#[derive(Default)]
struct RunState {
    translations: TranslationMap,
    /// Text→key memo, so a text seen in several files is named once.
    keys: HashMap<String, String>,
    processed_files: Vec<PathBuf>,
    rewritten_files: Vec<PathBuf>,
    spans: SpanCounts,
    file_errors: Vec<FileError>,
}

pub struct Extractor {
    config: Config,
    options: ExtractOptions,
    matcher: Box<dyn SpanMatcher>,
    exclusions: ExclusionRules,
    keys: KeyGenerator,
    rewriter: Box<dyn DocumentRewriter>,
    run_log: Option<RunLog>,
}

impl Extractor {
    /// Build an extractor from a validated configuration.
    pub fn new(config: Config, options: ExtractOptions) -> Result<Self> {
        config.validate()?;

        let matcher = RegexSpanMatcher::from_config(&config)?;
        let exclusions = ExclusionRules::new(&config.exclude_patterns)?;
        let keys = KeyGenerator::from_config(&config)?;
        let rewriter = QuotedLiteralRewriter::from_config(&config);
        let run_log = (config.generate_log && !options.dry_run)
            .then(|| RunLog::new(&config.log_path));

        Ok(Self {
            config,
            options,
            matcher: Box::new(matcher),
            exclusions,
            keys,
            rewriter: Box::new(rewriter),
            run_log,
        })
    }

    pub fn with_matcher(mut self, matcher: impl SpanMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn with_rewriter(mut self, rewriter: impl DocumentRewriter + 'static) -> Self {
        self.rewriter = Box::new(rewriter);
        self
    }

    /// Run the whole pipeline over every configured scan directory.
    ///
    /// File-level failures are collected in the summary. Only a dictionary
    /// failure aborts the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let scan = scan_files(
            &self.config.scan_dirs,
            &self.config.ignore,
            self.options.verbose,
        );
        self.run_files(&scan.files, scan.skipped_count).await
    }

    async fn run_files(&self, files: &[PathBuf], skipped_paths: usize) -> Result<RunSummary> {
        let mut state = RunState::default();

        for path in files {
            match self.process_file(path, &mut state).await {
                Ok(change) => {
                    state.spans.add(change.spans);
                    if change.rewritten {
                        state.rewritten_files.push(path.clone());
                    }
                    state.processed_files.push(path.clone());
                    self.log(&format!("Processed: {}", path.display())).await;
                }
                Err(err) => {
                    let message = format!("{:#}", err);
                    self.log(&format!("Error: {} - {}", path.display(), message))
                        .await;
                    state.file_errors.push(FileError {
                        path: path.clone(),
                        message,
                    });
                }
            }
        }

        let dictionary_path = PathBuf::from(&self.config.dict_path);
        let dictionary = if self.options.dry_run {
            None
        } else {
            let stats = merge_and_persist(&dictionary_path, &state.translations)
                .await
                .context("Failed to update dictionary")?;
            Some(stats)
        };

        Ok(RunSummary {
            files_found: files.len(),
            processed_files: state.processed_files,
            rewritten_files: state.rewritten_files,
            spans: state.spans,
            translations: state.translations,
            file_errors: state.file_errors,
            dictionary,
            dictionary_path,
            skipped_paths,
            dry_run: self.options.dry_run,
        })
    }

    async fn process_file(&self, path: &Path, state: &mut RunState) -> Result<FileChange> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if self.config.backup && !self.options.dry_run {
            backup_file(path, Path::new(&self.config.backup_dir)).await?;
        }

        let descriptor = parse_sfc(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let regions = [
            (Region::Template, descriptor.template),
            (Region::Script, descriptor.script),
        ];

        let mut staged = state.translations.clone();
        let mut new_keys: HashMap<String, String> = HashMap::new();
        let mut spans = SpanCounts::default();

        for (region, block) in regions {
            let Some(block) = block else { continue };
            for span in self.matcher.find_spans(block, region) {
                if !should_translate(&span.text, &self.exclusions) {
                    continue;
                }

                let cached = state
                    .keys
                    .get(&span.text)
                    .or_else(|| new_keys.get(&span.text))
                    .cloned();
                let key = match cached {
                    Some(key) => key,
                    None => {
                        let key = self.keys.generate(&span.text).await;
                        new_keys.insert(span.text.clone(), key.clone());
                        key
                    }
                };

                spans.record(span.region);
                staged.insert(key, span.text);
            }
        }

        let rewritten = self.rewriter.rewrite(&content, &staged);
        let changed = rewritten != content;
        if changed && !self.options.dry_run {
            fs::write(path, &rewritten)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        state.translations = staged;
        state.keys.extend(new_keys);

        Ok(FileChange {
            spans,
            rewritten: changed,
        })
    }

    async fn log(&self, event: &str) {
        let Some(run_log) = &self.run_log else {
            return;
        };
        if let Err(e) = run_log.append(event).await {
            eprintln!("{} {:#}", "warning:".bold().yellow(), e);
        }
    }
}
