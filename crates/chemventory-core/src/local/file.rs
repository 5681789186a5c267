//! File-backed key-value store: one `<key>.json` file per slot.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use notify::{RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use super::{
    validate_key, EventOrigin, ExternalWatch, KeyValueStore, StorageEvent, EVENT_CAPACITY,
};
use crate::error::{ChemventoryError, Result};

const SLOT_EXTENSION: &str = "json";

type SeenMap = Arc<Mutex<HashMap<String, SystemTime>>>;

/// Key-value slots persisted under a data directory.
///
/// Writes go through a temp file and a rename. Modification times of the
/// slots this instance wrote are remembered so the directory watcher only
/// reports writes made by other processes.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    events: broadcast::Sender<StorageEvent>,
    seen: SeenMap,
}

impl FileStore {
    /// Open a store rooted at `dir`. The directory is created on first write.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            dir: dir.into(),
            events,
            seen: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, SLOT_EXTENSION))
    }

    fn remember(&self, key: &str, path: &Path) {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        match modified(path) {
            Some(mtime) => {
                seen.insert(key.to_string(), mtime);
            }
            None => {
                seen.remove(key);
            }
        }
    }

    fn publish(&self, key: &str) {
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            origin: EventOrigin::Local,
        });
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ChemventoryError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                err
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.slot_path(key);
        crate::fs::write_atomic(&path, value.as_bytes())?;
        self.remember(key, &path);
        self.publish(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                return Err(ChemventoryError::Storage(format!(
                    "Failed to remove {}: {}",
                    path.display(),
                    err
                )))
            }
        }
        self.remember(key, &path);
        self.publish(key);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    fn watch_external(&self) -> Option<ExternalWatch> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::debug!("no Tokio runtime; external storage watch disabled");
                return None;
            }
        };

        if let Err(err) = fs::create_dir_all(&self.dir) {
            tracing::warn!(
                error = %err,
                dir = %self.dir.display(),
                "cannot create data directory; external storage watch disabled"
            );
            return None;
        }

        // Baseline: slots already on disk are not changes.
        {
            let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
            for (key, mtime) in scan_slots(&self.dir) {
                seen.entry(key).or_insert(mtime);
            }
        }

        let (paths, mut changed) = mpsc::unbounded_channel::<PathBuf>();
        let forward = move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                for path in event.paths {
                    let _ = paths.send(path);
                }
            }
            Err(err) => tracing::warn!(error = %err, "storage watch error"),
        };
        let mut watcher = match notify::recommended_watcher(forward) {
            Ok(watcher) => watcher,
            Err(err) => {
                tracing::warn!(error = %err, "cannot start storage watcher");
                return None;
            }
        };
        if let Err(err) = watcher.watch(&self.dir, RecursiveMode::NonRecursive) {
            tracing::warn!(error = %err, dir = %self.dir.display(), "cannot watch data directory");
            return None;
        }

        let dir = self.dir.clone();
        let seen = Arc::clone(&self.seen);
        let events = self.events.clone();
        let handle = runtime.spawn(async move {
            while let Some(path) = changed.recv().await {
                let Some(key) = slot_key(&path) else {
                    continue;
                };
                if !observe_slot(&dir, &key, &seen) {
                    continue;
                }
                tracing::debug!(key = %key, "slot changed on disk");
                let _ = events.send(StorageEvent {
                    key,
                    origin: EventOrigin::External,
                });
            }
        });
        Some(ExternalWatch::new(watcher, handle))
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Key of a slot file, `None` for temp files and anything else.
fn slot_key(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
        return None;
    }
    let key = path.file_stem()?.to_str()?.to_string();
    validate_key(&key).ok()?;
    Some(key)
}

/// Current slot files and their modification times.
fn scan_slots(dir: &Path) -> Vec<(String, SystemTime)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            Some((slot_key(&path)?, modified(&path)?))
        })
        .collect()
}

/// Compare one slot on disk against its remembered mtime, updating it.
///
/// True when the slot was written or removed by someone else since the last
/// look. Own writes were remembered by `set`/`remove` and compare equal, as
/// do repeated filesystem events for one write.
fn observe_slot(dir: &Path, key: &str, seen: &SeenMap) -> bool {
    let path = dir.join(format!("{}.{}", key, SLOT_EXTENSION));
    let current = modified(&path);
    let mut seen = seen.lock().unwrap_or_else(PoisonError::into_inner);
    if seen.get(key).copied() == current {
        return false;
    }
    match current {
        Some(mtime) => {
            seen.insert(key.to_string(), mtime);
        }
        None => {
            seen.remove(key);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip_through_files() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data"));

        assert_eq!(store.get("chemicals_v1").unwrap(), None);
        store.set("chemicals_v1", "[1,2]").unwrap();
        assert_eq!(store.get("chemicals_v1").unwrap().as_deref(), Some("[1,2]"));
        assert!(store.slot_path("chemicals_v1").exists());

        store.remove("chemicals_v1").unwrap();
        assert_eq!(store.get("chemicals_v1").unwrap(), None);
    }

    #[test]
    fn test_second_instance_sees_writes() {
        let dir = tempdir().unwrap();
        let a = FileStore::open(dir.path());
        let b = FileStore::open(dir.path());

        a.set("auth_user", "{}").unwrap();
        assert_eq!(b.get("auth_user").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_observe_slot_ignores_own_writes() {
        let dir = tempdir().unwrap();
        let ours = FileStore::open(dir.path());
        ours.set("chemicals_v1", "[]").unwrap();

        assert!(!observe_slot(dir.path(), "chemicals_v1", &ours.seen));

        fs::remove_file(ours.slot_path("chemicals_v1")).unwrap();
        assert!(observe_slot(dir.path(), "chemicals_v1", &ours.seen));
        assert!(!observe_slot(dir.path(), "chemicals_v1", &ours.seen));

        fs::write(dir.path().join("app_users.json"), "[]").unwrap();
        assert!(observe_slot(dir.path(), "app_users", &ours.seen));
        assert!(!observe_slot(dir.path(), "app_users", &ours.seen));
    }

    #[test]
    fn test_slot_key_skips_temp_files() {
        assert_eq!(
            slot_key(Path::new("/data/chemicals_v1.json")).as_deref(),
            Some("chemicals_v1")
        );
        assert_eq!(slot_key(Path::new("/data/.chemicals_v1.json.42.7.tmp")), None);
        assert_eq!(slot_key(Path::new("/data/notes.txt")), None);
    }

    #[test]
    fn test_watch_external_without_runtime_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path());
        assert!(store.watch_external().is_none());
    }

    #[tokio::test]
    async fn test_watch_external_reports_other_writers() {
        let dir = tempdir().unwrap();
        let watcher = FileStore::open(dir.path().join("data"));
        let writer = FileStore::open(dir.path().join("data"));
        let mut rx = watcher.subscribe();
        let _watch = watcher.watch_external().expect("runtime available");

        writer.set("chemicals_v1", "[]").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event before timeout")
            .expect("channel open");
        assert_eq!(event.key, "chemicals_v1");
        assert_eq!(event.origin, EventOrigin::External);
    }

    #[tokio::test]
    async fn test_watch_external_skips_own_writes() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path());
        let mut rx = store.subscribe();
        let _watch = store.watch_external().expect("runtime available");

        store.set("chemicals_v1", "[]").unwrap();
        let first = rx.recv().await.expect("channel open");
        assert_eq!(first.origin, EventOrigin::Local);

        let extra = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
        assert!(extra.is_err(), "own write reported again: {:?}", extra);
    }
}
