use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".i18n-extract.json";

/// Environment variable consulted for the key-naming credential.
pub const API_KEY_ENV: &str = "I18N_EXTRACT_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_scan_dirs")]
    pub scan_dirs: Vec<String>,
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
    #[serde(default = "default_dict_path", alias = "i18nPath")]
    pub dict_path: String,
    #[serde(default)]
    pub backup: bool,
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
    #[serde(default)]
    pub generate_log: bool,
    #[serde(default = "default_log_path")]
    pub log_path: String,
    #[serde(default = "default_script_pattern")]
    pub script_pattern: String,
    #[serde(default)]
    pub comment_patterns: CommentPatterns,
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
    #[serde(default = "default_call_name")]
    pub call_name: String,
    #[serde(default = "default_receiver")]
    pub receiver: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_naming: Option<KeyNamingConfig>,
}

/// Regions stripped from a block before span matching.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPatterns {
    #[serde(default = "default_single_line_comment")]
    pub single_line: String,
    #[serde(default = "default_multi_line_comment")]
    pub multi_line: String,
    #[serde(default = "default_markup_comment")]
    pub markup: String,
}

impl Default for CommentPatterns {
    fn default() -> Self {
        Self {
            single_line: default_single_line_comment(),
            multi_line: default_multi_line_comment(),
            markup: default_markup_comment(),
        }
    }
}

impl CommentPatterns {
    /// Patterns with their config field names, in stripping order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("commentPatterns.markup", self.markup.as_str()),
            ("commentPatterns.multiLine", self.multi_line.as_str()),
            ("commentPatterns.singleLine", self.single_line.as_str()),
        ]
        .into_iter()
    }
}

/// Remote key-naming service settings.
///
/// When absent, keys are always derived locally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyNamingConfig {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl KeyNamingConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            max_length: default_max_length(),
        }
    }
}

fn default_scan_dirs() -> Vec<String> {
    vec!["./src".to_string()]
}

fn default_ignore() -> Vec<String> {
    ["node_modules", "dist"].map(String::from).to_vec()
}

fn default_dict_path() -> String {
    "./i18n/zh-CN.json".to_string()
}

fn default_backup_dir() -> String {
    "./i18n-backup".to_string()
}

fn default_log_path() -> String {
    "./i18n-extract.log".to_string()
}

fn default_script_pattern() -> String {
    r"[\u4e00-\u9fa5]+".to_string()
}

fn default_single_line_comment() -> String {
    r"//.*".to_string()
}

fn default_multi_line_comment() -> String {
    r"/\*[\s\S]*?\*/".to_string()
}

fn default_markup_comment() -> String {
    r"<!--[\s\S]*?-->".to_string()
}

fn default_exclude_patterns() -> Vec<String> {
    [r"\d+", r"[a-zA-Z\s]+", r"[!@#$%^&*()]+"]
        .map(String::from)
        .to_vec()
}

fn default_call_name() -> String {
    "$t".to_string()
}

fn default_receiver() -> String {
    "this".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_max_length() -> usize {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_dirs: default_scan_dirs(),
            ignore: default_ignore(),
            dict_path: default_dict_path(),
            backup: false,
            backup_dir: default_backup_dir(),
            generate_log: false,
            log_path: default_log_path(),
            script_pattern: default_script_pattern(),
            comment_patterns: CommentPatterns::default(),
            exclude_patterns: default_exclude_patterns(),
            call_name: default_call_name(),
            receiver: default_receiver(),
            key_naming: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Every regex and every glob-style ignore entry must compile; the error names
    /// the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.scan_dirs.is_empty() {
            anyhow::bail!("'scanDirs' must list at least one directory");
        }

        for pattern in &self.ignore {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern)
                    .with_context(|| format!("Invalid glob pattern in 'ignore': \"{}\"", pattern))?;
            }
        }

        Regex::new(&self.script_pattern).with_context(|| {
            format!(
                "Invalid regex in 'scriptPattern': \"{}\"",
                self.script_pattern
            )
        })?;

        for (field, pattern) in self.comment_patterns.iter() {
            Regex::new(pattern)
                .with_context(|| format!("Invalid regex in '{}': \"{}\"", field, pattern))?;
        }

        for pattern in &self.exclude_patterns {
            Regex::new(pattern).with_context(|| {
                format!("Invalid regex in 'excludePatterns': \"{}\"", pattern)
            })?;
        }

        if let Some(naming) = &self.key_naming {
            if naming.endpoint.trim().is_empty() {
                anyhow::bail!("'keyNaming.endpoint' must not be empty");
            }
            if naming.timeout_ms == 0 {
                anyhow::bail!("'keyNaming.timeoutMs' must be greater than zero");
            }
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
