/*!
 * File cache for rendered documents.
 *
 * Every (language, document type) pair owns one file below the cache root:
 * `<root>/<language>/<document type>.html`. The file holds the final markup
 * and its modification time decides whether it is still fresh.
 */

use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::errors::CacheError;
use crate::file_utils::FileManager;

/// On-disk cache of rendered documents
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Cache root directory
    root: PathBuf,
}

impl CacheStore {
    /// Create a cache rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for a document in a language
    pub fn entry_path(&self, language: &str, document_type: &str) -> PathBuf {
        self.root
            .join(language)
            .join(format!("{}.html", document_type))
    }

    /// Create the directory holding `path` if it is missing
    pub fn ensure_parent(&self, path: &Path) -> Result<(), CacheError> {
        match path.parent() {
            Some(parent) => FileManager::ensure_dir(parent).map_err(|e| io_error(parent, e)),
            None => Ok(()),
        }
    }

    /// Check whether the entry exists and is younger than `ttl_secs`
    pub fn is_fresh(&self, path: &Path, ttl_secs: u64) -> bool {
        is_fresh_at(path, ttl_secs, SystemTime::now())
    }

    /// Read an entry, yielding an empty string when it is absent or unreadable
    pub fn read(&self, path: &Path) -> String {
        if !FileManager::file_exists(path) {
            debug!("Cache miss for {:?}", path);
            return String::new();
        }

        match FileManager::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read cache entry: {}", e);
                String::new()
            }
        }
    }

    /// Replace an entry with `content`
    pub fn write(&self, path: &Path, content: &str) -> Result<(), CacheError> {
        FileManager::replace_file(path, content).map_err(|e| io_error(path, e))?;
        debug!("Cached {} bytes in {:?}", content.len(), path);
        Ok(())
    }

    /// Mark an entry as stale while keeping its content as fallback
    pub fn invalidate(&self, path: &Path) -> Result<(), CacheError> {
        FileManager::set_modified_time(path, UNIX_EPOCH).map_err(|e| io_error(path, e))
    }

    /// All entries, optionally filtered by language and document type
    pub fn entries(
        &self,
        language: Option<&str>,
        document_type: Option<&str>,
    ) -> Result<Vec<PathBuf>, CacheError> {
        let files = FileManager::find_files(&self.root, "html").map_err(|e| io_error(&self.root, e))?;

        Ok(files
            .into_iter()
            .filter(|path| {
                let entry_language = path
                    .parent()
                    .and_then(|dir| dir.file_name())
                    .map(|name| name.to_string_lossy().to_string());
                let entry_type = path.file_stem().map(|stem| stem.to_string_lossy().to_string());

                language.is_none_or(|wanted| entry_language.as_deref() == Some(wanted))
                    && document_type.is_none_or(|wanted| entry_type.as_deref() == Some(wanted))
            })
            .collect())
    }
}

/// Freshness check against an explicit clock
///
/// A TTL of 0 is never fresh. An entry whose age equals the TTL is stale.
pub fn is_fresh_at(path: &Path, ttl_secs: u64, now: SystemTime) -> bool {
    if ttl_secs == 0 {
        return false;
    }

    let modified = match FileManager::modified_time(path) {
        Ok(modified) => modified,
        Err(_) => return false,
    };

    // Entries dated in the future count as brand new
    let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
    age < Duration::from_secs(ttl_secs)
}

fn io_error(path: &Path, error: anyhow::Error) -> CacheError {
    CacheError::Io {
        path: path.display().to_string(),
        message: format!("{:#}", error),
    }
}
