use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Where the admin session token lives between CLI invocations.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> anyhow::Result<()>;

    fn clear(&self) -> anyhow::Result<()>;
}

/// Token persisted as a single `token` file in the CLI config directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{config_dir}/token`
    pub fn in_config_dir() -> anyhow::Result<Self> {
        Ok(Self::new(super::config::get_config_dir()?.join("token")))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn set(&self, token: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store, used by tests and one-shot scripts.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, token: &str) -> anyhow::Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

impl<T: TokenStore + ?Sized> TokenStore for std::sync::Arc<T> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: &str) -> anyhow::Result<()> {
        (**self).set(token)
    }

    fn clear(&self) -> anyhow::Result<()> {
        (**self).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_clears() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(tmp.path().join("nested").join("token"));

        assert!(store.get().is_none());
        store.set("abc.def.ghi").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));

        store.clear().unwrap();
        assert!(store.get().is_none());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn memory_store_starts_empty() {
        let store = MemoryTokenStore::default();
        assert!(store.get().is_none());
        store.set("t").unwrap();
        assert_eq!(store.get().as_deref(), Some("t"));
    }
}
