//! Result-set storage.
//!
//! Search results are saved twice, as `<base>_<timestamp>.json` and
//! `<base>_<timestamp>.txt`; either file can be analyzed later.

pub mod text;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::models::{ArticleRecord, ResultSet};

/// Base name used when a save request does not give one.
pub const DEFAULT_BASE_NAME: &str = "pubmed_results";

/// Result files grouped by format, each sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSetListing {
    /// `.json` files (recommended for analysis).
    pub json: Vec<String>,
    /// `.txt` files.
    pub txt: Vec<String>,
}

impl ResultSetListing {
    /// Total number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.json.len() + self.txt.len()
    }

    /// True when no result files exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.json.is_empty() && self.txt.is_empty()
    }
}

/// Names of the files written by one save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedResultSet {
    /// JSON file name.
    pub json_file: String,
    /// Text file name.
    pub txt_file: String,
    /// Articles written.
    pub article_count: usize,
}

/// Named, persisted result sets.
pub trait ResultStore: Send + Sync {
    /// Load a result set by file name. All or nothing.
    fn load(&self, name: &str) -> StoreResult<ResultSet>;

    /// List the stored result files.
    fn list(&self) -> StoreResult<ResultSetListing>;

    /// Save `result_set` under `<base>_<timestamp>` in both formats.
    fn save(&self, base_name: Option<&str>, result_set: &ResultSet) -> StoreResult<SavedResultSet>;
}

/// JSON layout on disk.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum JsonFile {
    Wrapped {
        #[serde(default)]
        query: Option<String>,
        #[serde(default, alias = "timestamp")]
        retrieved_at: Option<String>,
        #[serde(default)]
        article_count: Option<usize>,
        articles: Vec<ArticleRecord>,
    },
    Bare(Vec<ArticleRecord>),
}

/// Result sets stored as files in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Store rooted at `root`. The directory is created on first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the result files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> StoreResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    fn write(&self, name: &str, contents: &str) -> StoreResult<()> {
        let path = self.root.join(name);
        fs::write(&path, contents).map_err(|e| StoreError::io(path, e))
    }
}

impl ResultStore for FileStore {
    fn load(&self, name: &str) -> StoreResult<ResultSet> {
        let path = self.path_for(name)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::not_found(name)),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let result_set = if has_extension(name, "json") {
            let parsed: JsonFile = serde_json::from_str(&content)
                .map_err(|source| StoreError::Json { name: name.to_string(), source })?;
            match parsed {
                JsonFile::Wrapped { query, retrieved_at, articles, .. } => {
                    ResultSet { query, retrieved_at, articles }
                }
                JsonFile::Bare(articles) => ResultSet { articles, ..ResultSet::default() },
            }
        } else {
            ResultSet { articles: text::parse(name, &content)?, ..ResultSet::default() }
        };

        debug!(name, articles = result_set.len(), "Loaded result set");
        Ok(result_set)
    }

    fn list(&self) -> StoreResult<ResultSetListing> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ResultSetListing::default()),
            Err(e) => return Err(StoreError::io(&self.root, e)),
        };

        let mut listing = ResultSetListing::default();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            if !entry.file_type().map_err(|e| StoreError::io(entry.path(), e))?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if has_extension(&name, "json") {
                listing.json.push(name);
            } else if has_extension(&name, "txt") {
                listing.txt.push(name);
            }
        }
        listing.json.sort();
        listing.txt.sort();
        Ok(listing)
    }

    fn save(&self, base_name: Option<&str>, result_set: &ResultSet) -> StoreResult<SavedResultSet> {
        let base = match base_name.map(str::trim).filter(|b| !b.is_empty()) {
            Some(raw) => {
                validate_name(raw)?;
                let base = strip_extension(raw).trim();
                if base.chars().all(|c| c == '.') {
                    return Err(StoreError::InvalidName { name: raw.to_string() });
                }
                base
            }
            None => DEFAULT_BASE_NAME,
        };

        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let stem = format!("{base}_{}", Local::now().format("%Y%m%d%H%M%S"));
        let json_file = format!("{stem}.json");
        let txt_file = format!("{stem}.txt");

        let on_disk = JsonFile::Wrapped {
            query: result_set.query.clone(),
            retrieved_at: result_set.retrieved_at.clone(),
            article_count: Some(result_set.len()),
            articles: result_set.articles.clone(),
        };
        let json = serde_json::to_string_pretty(&on_disk)
            .map_err(|source| StoreError::Json { name: json_file.clone(), source })?;

        self.write(&json_file, &json)?;
        self.write(&txt_file, &text::render(&result_set.articles))?;

        info!(%json_file, %txt_file, articles = result_set.len(), "Saved result set");
        Ok(SavedResultSet { json_file, txt_file, article_count: result_set.len() })
    }
}

/// Reject names that are empty or could leave the store directory.
fn validate_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(StoreError::InvalidName { name: name.to_string() });
    }
    Ok(())
}

fn has_extension(name: &str, ext: &str) -> bool {
    Path::new(name).extension().is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Drop a `.json` or `.txt` extension; other dots are part of the name.
fn strip_extension(name: &str) -> &str {
    if has_extension(name, "json") || has_extension(name, "txt") {
        name.rsplit_once('.').map_or(name, |(stem, _)| stem)
    } else {
        name
    }
}
