//! Filesystem clip cache.
//!
//! Each namespace is a directory under the data root; each entry is a file
//! at the key's path with the leading `/` stripped, so
//! `/audio/child_ron_mangan.mp3` lands at `<root>/audio-cache/audio/child_ron_mangan.mp3`.
//! Writes go to a temp file in the target directory and are renamed into
//! place, so readers never observe a partial clip.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tensu_core::{CacheError, ClipCache, ClipCacheStore};

/// Prefix of in-flight temp files; never reported as keys.
const TEMP_PREFIX: &str = ".tmp";

/// Opens namespaces as directories under `root`.
#[derive(Debug, Clone)]
pub struct FsClipCacheStore {
    root: PathBuf,
}

impl FsClipCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ClipCacheStore for FsClipCacheStore {
    async fn open(&self, namespace: &str) -> Result<Arc<dyn ClipCache>, CacheError> {
        let open_err = |reason: String| CacheError::Open {
            namespace: namespace.to_string(),
            reason,
        };
        if namespace.is_empty() || namespace.contains(['/', '\\']) || namespace.starts_with('.') {
            return Err(open_err("invalid namespace".into()));
        }

        let dir = self.root.join(namespace);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| open_err(e.to_string()))?;
        tracing::debug!(dir = %dir.display(), "Opened clip cache");
        Ok(Arc::new(FsClipCache { dir }))
    }
}

/// One namespace directory.
#[derive(Debug)]
pub struct FsClipCache {
    dir: PathBuf,
}

impl FsClipCache {
    /// Map a key to its file, rejecting anything that could escape the
    /// namespace directory.
    fn entry_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        let relative = key.strip_prefix('/').unwrap_or(key);
        let invalid = || CacheError::InvalidKey(key.to_string());

        if relative.is_empty() || relative.contains('\\') {
            return Err(invalid());
        }
        for segment in relative.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(invalid());
            }
            if segment.starts_with(TEMP_PREFIX) {
                return Err(invalid());
            }
        }
        if !Path::new(relative)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(invalid());
        }
        Ok(self.dir.join(relative))
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.dir).ok()?;
        let segments: Vec<&str> = relative
            .components()
            .map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect::<Option<_>>()?;
        Some(format!("/{}", segments.join("/")))
    }
}

#[async_trait]
impl ClipCache for FsClipCache {
    async fn keys(&self) -> Result<HashSet<String>, CacheError> {
        let mut keys = HashSet::new();
        let mut pending = vec![self.dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| CacheError::Io(format!("{}: {e}", dir.display())))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| CacheError::Io(e.to_string()))?
            {
                let path = entry.path();
                if entry
                    .file_name()
                    .to_str()
                    .is_some_and(|n| n.starts_with(TEMP_PREFIX))
                {
                    continue;
                }
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| CacheError::Io(e.to_string()))?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if let Some(key) = self.key_for(&path) {
                    keys.insert(key);
                }
            }
        }
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io(format!("{}: {e}", path.display()))),
        }
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| CacheError::InvalidKey(key.to_string()))?;
        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|e| CacheError::Io(format!("{}: {e}", parent.display())))?;

        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || write_atomic(&parent, &path, &bytes))
            .await
            .map_err(|e| CacheError::Io(e.to_string()))?
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| CacheError::Io(e.to_string()))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| CacheError::Io(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| CacheError::Io(format!("{}: {}", path.display(), e.error)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensu_core::AUDIO_CACHE_NAMESPACE;

    async fn open(root: &Path) -> Arc<dyn ClipCache> {
        FsClipCacheStore::new(root)
            .open(AUDIO_CACHE_NAMESPACE)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn put_then_get_and_list() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = open(tmp.path()).await;

        cache
            .put("/audio/child_ron_mangan.mp3", b"clip")
            .await
            .unwrap();

        assert_eq!(
            cache.get("/audio/child_ron_mangan.mp3").await.unwrap(),
            Some(b"clip".to_vec())
        );
        let keys = cache.keys().await.unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys.contains("/audio/child_ron_mangan.mp3"));
        assert!(
            tmp.path()
                .join("audio-cache/audio/child_ron_mangan.mp3")
                .is_file()
        );
    }

    #[tokio::test]
    async fn missing_entry_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = open(tmp.path()).await;
        assert_eq!(cache.get("/audio/nope.mp3").await.unwrap(), None);
        assert!(cache.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = open(tmp.path()).await;
        for key in ["/../escape.mp3", "/audio/../../x", "//double", "/", "", "/a/./b", "/a\\b"] {
            assert!(
                matches!(cache.put(key, b"x").await, Err(CacheError::InvalidKey(_))),
                "{key} should be rejected"
            );
        }
        assert!(!tmp.path().join("escape.mp3").exists());
    }

    #[tokio::test]
    async fn bad_namespace_fails_to_open() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsClipCacheStore::new(tmp.path());
        assert!(matches!(
            store.open("../outside").await,
            Err(CacheError::Open { .. })
        ));
    }

    #[tokio::test]
    async fn open_fails_when_root_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plain");
        std::fs::write(&file, b"x").unwrap();
        let store = FsClipCacheStore::new(&file);
        assert!(store.open(AUDIO_CACHE_NAMESPACE).await.is_err());
    }
}
