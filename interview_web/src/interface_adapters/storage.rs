use crate::domain::SessionStore;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

type Entries = Arc<Mutex<HashMap<String, String>>>;

fn lock(entries: &Entries) -> MutexGuard<'_, HashMap<String, String>> {
    // A poisoned map is still a valid map; keep serving it.
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// Process-local key-value storage.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    entries: Entries,
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock(&self.entries).insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) -> bool {
        lock(&self.entries).remove(key).is_some()
    }
}

// Key-value storage persisted as a flat JSON object, rewritten on every change.
//
// Writes are small and synchronous. They serialize on `writer` so the map lock is
// only held for the in-memory update, and readers never wait on the disk.
#[derive(Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Entries,
    writer: Arc<Mutex<()>>,
}

impl FileSessionStore {
    // Missing or unreadable files start an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<HashMap<String, String>>(&bytes)
                .unwrap_or_else(|err| {
                    tracing::warn!(path = %path.display(), error = %err, "session file unreadable; starting empty");
                    HashMap::new()
                }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read session file");
                HashMap::new()
            }
        };

        Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
            writer: Arc::new(Mutex::new(())),
        }
    }

    // Applies `change` and writes the resulting snapshot while holding the writer lock,
    // so files on disk always reflect the latest change.
    fn update<T>(&self, change: impl FnOnce(&mut HashMap<String, String>) -> (T, bool)) -> T {
        let _writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let (result, snapshot) = {
            let mut entries = lock(&self.entries);
            let (result, changed) = change(&mut entries);
            (result, changed.then(|| HashMap::clone(&entries)))
        };
        if let Some(snapshot) = snapshot {
            self.persist(&snapshot);
        }
        result
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        let result = serde_json::to_vec_pretty(entries)
            .map_err(std::io::Error::other)
            .and_then(|bytes| {
                if let Some(dir) = self.path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                std::fs::write(&self.path, bytes)
            });
        if let Err(err) = result {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to persist session file");
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            ((), true)
        });
    }

    fn remove(&self, key: &str) -> bool {
        self.update(|entries| {
            let removed = entries.remove(key).is_some();
            (removed, removed)
        })
    }
}
