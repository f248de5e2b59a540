use std::{
    collections::HashSet,
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

/// Extension of the component files that are scanned.
pub const COMPONENT_EXTENSION: &str = "vue";

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as names or literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    /// Matching files, sorted and deduplicated.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Compiled ignore list for one scan root.
struct IgnoreSet {
    root: PathBuf,
    /// Bare names such as `node_modules`, matched against any path component.
    names: Vec<String>,
    /// Relative paths such as `src/legacy`, matched as a prefix under the root.
    paths: Vec<PathBuf>,
    globs: Vec<Pattern>,
}

impl IgnoreSet {
    fn new(root: &Path, ignore_patterns: &[String], verbose: bool) -> Self {
        let mut set = IgnoreSet {
            root: root.to_path_buf(),
            names: Vec::new(),
            paths: Vec::new(),
            globs: Vec::new(),
        };

        for p in ignore_patterns {
            if is_glob_pattern(p) {
                match Pattern::new(p) {
                    Ok(pattern) => set.globs.push(pattern),
                    Err(e) => {
                        if verbose {
                            eprintln!(
                                "{} Invalid ignore pattern '{}': {}",
                                "warning:".bold().yellow(),
                                p,
                                e
                            );
                        }
                    }
                }
            } else if p.contains('/') || p.contains('\\') {
                set.paths.push(root.join(p));
            } else {
                set.names.push(p.clone());
            }
        }

        set
    }

    fn is_ignored(&self, path: &Path) -> bool {
        if self.paths.iter().any(|ignored| path.starts_with(ignored)) {
            return true;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if relative.components().any(|c| match c {
            Component::Normal(name) => self.names.iter().any(|n| name == n.as_str()),
            _ => false,
        }) {
            return true;
        }

        let path_str = path.to_string_lossy();
        self.globs.iter().any(|p| p.matches(&path_str))
    }
}

/// Drop `.` components so that `./src` and `src` yield the same paths.
fn normalize_root(root: &str) -> PathBuf {
    let normalized: PathBuf = Path::new(root)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// List every component file under `roots`, skipping ignored paths.
///
/// A file reachable from several roots is listed once, under the first root
/// that reaches it.
pub fn scan_files(roots: &[String], ignore_patterns: &[String], verbose: bool) -> ScanResult {
    let mut files: Vec<PathBuf> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut skipped_count = 0;

    for root in roots {
        let root_path = normalize_root(root);
        let root_path = root_path.as_path();
        if !root_path.exists() {
            if verbose {
                eprintln!(
                    "{} Scan directory does not exist: {}",
                    "warning:".bold().yellow(),
                    root_path.display()
                );
            }
            continue;
        }

        let ignores = IgnoreSet::new(root_path, ignore_patterns, verbose);

        let walker = WalkDir::new(root_path)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !ignores.is_ignored(entry.path()));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_file() && is_component_file(path) {
                let identity = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
                if seen.insert(identity) {
                    files.push(path.to_path_buf());
                }
            }
        }
    }

    files.sort();
    ScanResult {
        files,
        skipped_count,
    }
}

fn is_component_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(COMPONENT_EXTENSION)
}
