//! Translation key generation.
//!
//! Keys come either from a deterministic local transform of the text, or from a
//! remote key-naming service. Every remote failure degrades to the local key.

use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, KeyNamingConfig};

/// Prefix of every locally generated key.
pub const KEY_PREFIX: &str = "text_";

/// Number of leading characters of the text a local key is built from.
const KEY_SOURCE_CHARS: usize = 10;

/// Instruction sent to the key-naming service along with the text.
pub const NAMING_INSTRUCTION: &str = "Suggest a short camelCase identifier, using only ASCII \
letters and digits, that describes the meaning of this UI text. \
Reply with the identifier only.";

/// Deterministic key derivation.
#[derive(Debug, Clone)]
pub struct LocalKeyGenerator {
    script: Regex,
}

impl LocalKeyGenerator {
    pub fn new(script_pattern: &str) -> Result<Self> {
        let script = Regex::new(script_pattern)
            .with_context(|| format!("Invalid script pattern: \"{}\"", script_pattern))?;
        Ok(Self { script })
    }

    /// Build a key from the first ten characters of `text`.
    ///
    /// Whitespace, target-script characters and anything else outside ASCII
    /// letters and digits become `_`; the rest is lower-cased.
    pub fn generate(&self, text: &str) -> String {
        let mut buf = [0u8; 4];
        let body: String = text
            .chars()
            .take(KEY_SOURCE_CHARS)
            .map(|c| {
                if c.is_whitespace()
                    || !c.is_ascii_alphanumeric()
                    || self.script.is_match(c.encode_utf8(&mut buf))
                {
                    '_'
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect();
        format!("{}{}", KEY_PREFIX, body)
    }
}

/// Why a remote key suggestion could not be used.
#[derive(Debug, Error)]
pub enum KeyNamingError {
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service responded with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("suggestion is empty after sanitizing")]
    EmptySuggestion,
}

/// Result of asking the key-naming service for a key.
#[derive(Debug)]
pub enum KeyOutcome {
    /// The sanitized suggestion from the service.
    Suggested(String),
    /// The local key, used because the service could not provide one.
    Fallback { key: String, cause: KeyNamingError },
}

impl KeyOutcome {
    pub fn key(&self) -> &str {
        match self {
            KeyOutcome::Suggested(key) => key,
            KeyOutcome::Fallback { key, .. } => key,
        }
    }

    pub fn into_key(self) -> String {
        match self {
            KeyOutcome::Suggested(key) => key,
            KeyOutcome::Fallback { key, .. } => key,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NamingRequest<'a> {
    text: &'a str,
    instruction: &'a str,
    max_length: usize,
}

#[derive(Debug, Deserialize)]
struct NamingResponse {
    suggestion: String,
}

/// Strip everything outside `[A-Za-z0-9]` from a suggestion.
pub fn sanitize_suggestion(suggestion: &str) -> String {
    suggestion
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Key generation through the remote key-naming service.
#[derive(Debug, Clone)]
pub struct RemoteKeyGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout_ms: u64,
    max_length: usize,
    fallback: LocalKeyGenerator,
}

impl RemoteKeyGenerator {
    pub fn new(config: &KeyNamingConfig, fallback: LocalKeyGenerator) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("Failed to build HTTP client for key naming")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout_ms: config.timeout_ms,
            max_length: config.max_length,
            fallback,
        })
    }

    async fn request_suggestion(&self, text: &str) -> Result<String, KeyNamingError> {
        let body = NamingRequest {
            text,
            instruction: NAMING_INSTRUCTION,
            max_length: self.max_length,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyNamingError::Status(status.as_u16()));
        }

        let naming: NamingResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                KeyNamingError::Timeout(self.timeout_ms)
            } else {
                KeyNamingError::Malformed(e.to_string())
            }
        })?;

        Ok(naming.suggestion)
    }

    fn classify(&self, err: reqwest::Error) -> KeyNamingError {
        if err.is_timeout() {
            KeyNamingError::Timeout(self.timeout_ms)
        } else {
            KeyNamingError::Transport(err.to_string())
        }
    }

    /// Ask the service for a key, falling back to the local key on any failure.
    pub async fn name(&self, text: &str) -> KeyOutcome {
        let cause = match self.request_suggestion(text).await {
            Ok(suggestion) => {
                let key = sanitize_suggestion(&suggestion);
                if !key.is_empty() {
                    return KeyOutcome::Suggested(key);
                }
                KeyNamingError::EmptySuggestion
            }
            Err(cause) => cause,
        };

        KeyOutcome::Fallback {
            key: self.fallback.generate(text),
            cause,
        }
    }
}

/// The key generator selected by configuration.
#[derive(Debug, Clone)]
pub enum KeyGenerator {
    Local(LocalKeyGenerator),
    Remote(RemoteKeyGenerator),
}

impl KeyGenerator {
    pub fn from_config(config: &Config) -> Result<Self> {
        let local = LocalKeyGenerator::new(&config.script_pattern)?;
        match &config.key_naming {
            Some(naming) => Ok(KeyGenerator::Remote(RemoteKeyGenerator::new(naming, local)?)),
            None => Ok(KeyGenerator::Local(local)),
        }
    }

    /// Generate a key for `text`. Never fails; remote failures are reported as
    /// warnings and the local key is returned instead.
    pub async fn generate(&self, text: &str) -> String {
        match self {
            KeyGenerator::Local(local) => local.generate(text),
            KeyGenerator::Remote(remote) => match remote.name(text).await {
                KeyOutcome::Suggested(key) => key,
                KeyOutcome::Fallback { key, cause } => {
                    eprintln!(
                        "{} Key naming failed for \"{}\" ({}), using {}",
                        "warning:".bold().yellow(),
                        text,
                        cause,
                        key.cyan()
                    );
                    key
                }
            },
        }
    }
}
