//! Memoized configuration loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use tracing::debug;

use crate::config::{CheckstyleConfig, Properties};
use crate::error::ConfigError;

#[derive(Debug)]
struct Entry {
    modified: Option<SystemTime>,
    config: Arc<CheckstyleConfig>,
}

/// Parsed configurations keyed by canonical path.
///
/// An entry is reloaded when the file's modification time changes.
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: RwLock<HashMap<PathBuf, Entry>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the configuration at `path`, loading it on first use.
    pub fn get_or_load(
        &self,
        path: &Path,
        properties: &Properties,
    ) -> Result<Arc<CheckstyleConfig>, ConfigError> {
        let key = path.canonicalize().map_err(|e| ConfigError::io(path, e))?;
        let modified = fs::metadata(&key).and_then(|m| m.modified()).ok();

        if let Ok(entries) = self.entries.read() {
            if let Some(entry) = entries.get(&key) {
                if entry.modified == modified {
                    return Ok(Arc::clone(&entry.config));
                }
            }
        }

        debug!(path = %key.display(), "loading configuration");
        let config = Arc::new(CheckstyleConfig::load(&key, properties)?);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key,
                Entry {
                    modified,
                    config: Arc::clone(&config),
                },
            );
        }
        Ok(config)
    }

    /// Drop the entry for `path`. Returns whether one was cached.
    pub fn invalidate(&self, path: &Path) -> bool {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries
            .write()
            .map(|mut entries| entries.remove(&key).is_some())
            .unwrap_or(false)
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const ONE: &str = r#"<module name="Checker"><module name="TreeWalker">
        <module name="NeedBraces"/>
    </module></module>"#;

    const TWO: &str = r#"<module name="Checker"><module name="TreeWalker">
        <module name="NeedBraces"/>
        <module name="EmptyStatement"/>
    </module></module>"#;

    #[test]
    fn test_reuses_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkstyle.xml");
        fs::write(&path, ONE).unwrap();

        let cache = ConfigCache::new();
        let first = cache.get_or_load(&path, &Properties::new()).unwrap();
        let second = cache.get_or_load(&path, &Properties::new()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_reloads_on_mtime_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkstyle.xml");
        fs::write(&path, ONE).unwrap();

        let cache = ConfigCache::new();
        let first = cache.get_or_load(&path, &Properties::new()).unwrap();
        assert_eq!(first.modules.len(), 1);

        fs::write(&path, TWO).unwrap();
        let later = SystemTime::now() + Duration::from_secs(5);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        let second = cache.get_or_load(&path, &Properties::new()).unwrap();
        assert_eq!(second.modules.len(), 2);
    }

    #[test]
    fn test_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkstyle.xml");
        fs::write(&path, ONE).unwrap();

        let cache = ConfigCache::new();
        cache.get_or_load(&path, &Properties::new()).unwrap();
        assert!(cache.invalidate(&path));
        assert!(!cache.invalidate(&path));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let cache = ConfigCache::new();
        let err = cache
            .get_or_load(Path::new("/nonexistent/checkstyle.xml"), &Properties::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }
}
