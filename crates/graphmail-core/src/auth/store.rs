//! On-disk persistence for the credential cache.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Moves the serialized credential cache to and from a file.
///
/// Load failures degrade to "start empty": losing the cache costs one
/// interactive sign-in, never the process.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the serialized cache, if one exists and is readable.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read token cache");
                None
            }
        }
    }

    /// Writes the serialized cache.
    ///
    /// Writes to a sibling temp file and renames it into place, so a crash
    /// mid-write cannot leave a truncated cache.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; callers log it and keep going.
    pub fn save(&self, contents: &str) -> io::Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token_cache.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token_cache.json"));

        store.save(r#"{"accounts":[]}"#).unwrap();
        assert_eq!(store.load().as_deref(), Some(r#"{"accounts":[]}"#));
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token_cache.json"));

        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load().as_deref(), Some("second"));
        // The temp file must not linger after a successful rename.
        assert!(!dir.path().join("token_cache.tmp").exists());
    }

    #[test]
    fn test_save_into_missing_directory_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nope").join("token_cache.json"));
        assert!(store.save("{}").is_err());
    }
}
