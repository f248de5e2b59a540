use std::{
    io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::fs;

use super::TranslationMap;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to read dictionary {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse dictionary {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Root of dictionary {} must be an object", .path.display())]
    NotAnObject { path: PathBuf },
    #[error("Dictionary {} is not a flat key-to-string mapping (key \"{key}\")", .path.display())]
    NonStringValue { path: PathBuf, key: String },
    #[error("Failed to serialize dictionary: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write dictionary {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Action taken on a key during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    Updated,
    Unchanged,
}

/// Counts of what a merge did to the dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl MergeStats {
    fn record(&mut self, action: KeyAction) {
        match action {
            KeyAction::Added => self.added += 1,
            KeyAction::Updated => self.updated += 1,
            KeyAction::Unchanged => self.unchanged += 1,
        }
    }
}

/// Insert a single entry, reporting what happened to the key.
fn insert_entry(root: &mut Map<String, Value>, key: &str, text: &str) -> KeyAction {
    match root.get_mut(key) {
        Some(Value::String(existing)) if existing == text => KeyAction::Unchanged,
        Some(existing) => {
            *existing = Value::String(text.to_string());
            KeyAction::Updated
        }
        None => {
            root.insert(key.to_string(), Value::String(text.to_string()));
            KeyAction::Added
        }
    }
}

/// Merge `entries` over `existing`; entries win on key collision.
///
/// Existing keys keep their position, new keys are appended in key order.
pub fn merge(existing: &mut Map<String, Value>, entries: &TranslationMap) -> MergeStats {
    let mut stats = MergeStats::default();
    for (key, text) in entries {
        stats.record(insert_entry(existing, key, text));
    }
    stats
}

/// The persisted key→text dictionary.
pub struct Dictionary {
    file_path: PathBuf,
    data: Map<String, Value>,
}

impl Dictionary {
    /// Open an existing dictionary, or start an empty one if the file is missing.
    ///
    /// A file that exists but cannot be read or is not a flat string mapping is
    /// an error.
    pub async fn open_or_create(path: &Path) -> Result<Self, DictionaryError> {
        let data = match fs::read_to_string(path).await {
            Ok(content) => parse_dictionary(path, &content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(source) => {
                return Err(DictionaryError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Ok(Self {
            file_path: path.to_path_buf(),
            data,
        })
    }

    pub fn merge(&mut self, entries: &TranslationMap) -> MergeStats {
        merge(&mut self.data, entries)
    }

    /// Write the dictionary with 2-space indentation and a trailing newline.
    pub async fn save(&self) -> Result<(), DictionaryError> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| DictionaryError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let content = serde_json::to_string_pretty(&self.data)?;

        fs::write(&self.file_path, format!("{}\n", content))
            .await
            .map_err(|source| DictionaryError::Write {
                path: self.file_path.clone(),
                source,
            })
    }
}

fn parse_dictionary(path: &Path, content: &str) -> Result<Map<String, Value>, DictionaryError> {
    let value: Value = serde_json::from_str(content).map_err(|source| DictionaryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Object(map) = value else {
        return Err(DictionaryError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    if let Some((key, _)) = map.iter().find(|(_, v)| !v.is_string()) {
        return Err(DictionaryError::NonStringValue {
            path: path.to_path_buf(),
            key: key.clone(),
        });
    }

    Ok(map)
}

/// Fold `entries` into the dictionary at `path` and write it back.
pub async fn merge_and_persist(
    path: &Path,
    entries: &TranslationMap,
) -> Result<MergeStats, DictionaryError> {
    let mut dictionary = Dictionary::open_or_create(path).await?;
    let stats = dictionary.merge(entries);
    dictionary.save().await?;
    Ok(stats)
}
