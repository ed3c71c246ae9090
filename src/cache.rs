//! Local JSON cache of fetched publications.
//!
//! The whole record list is written to a single file; the file's
//! modification time decides whether it can be reused.

use crate::error::Result;
use crate::zotero::Publication;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Default cache file name, relative to the working directory
pub const DEFAULT_CACHE_FILE: &str = "zotero.json";

/// Cached data is reused while younger than this
pub const MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// File-backed publication cache
#[derive(Debug, Clone)]
pub struct PublicationCache {
    path: PathBuf,
    max_age: Duration,
}

impl PublicationCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age: MAX_AGE,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the cache file exists and was modified less than a day before `now`.
    ///
    /// A modification time in the future counts as fresh.
    pub fn is_fresh_at(&self, now: SystemTime) -> Result<bool> {
        let modified = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        debug!(path = ?self.path, age_secs = age.as_secs(), "Cache age");
        Ok(age < self.max_age)
    }

    /// Read the cached records. A corrupt file is an error, not a miss.
    pub fn load(&self) -> Result<Vec<Publication>> {
        let content = std::fs::read_to_string(&self.path)?;
        let items: Vec<Publication> = serde_json::from_str(&content)?;
        info!("Loaded {} publications from {:?}", items.len(), self.path);
        Ok(items)
    }

    /// Overwrite the cache file with `items`.
    pub fn save(&self, items: &[Publication]) -> Result<()> {
        let content = serde_json::to_string(items)?;
        std::fs::write(&self.path, content)?;
        info!("Saved {} publications to {:?}", items.len(), self.path);
        Ok(())
    }

    /// Serve fresh cached data, or run `fetch` and refresh the cache with its result.
    pub async fn get_publications<F, Fut>(&self, fetch: F) -> Result<Vec<Publication>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Publication>>>,
    {
        if self.is_fresh_at(SystemTime::now())? {
            return self.load();
        }

        let items = fetch().await?;
        self.save(&items)?;
        Ok(items)
    }
}

impl Default for PublicationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_FILE)
    }
}
