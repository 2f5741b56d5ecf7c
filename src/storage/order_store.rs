use std::{
    collections::HashMap,
    io::ErrorKind,
    ops::Deref,
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{anyhow, bail, Result};
use tracing::debug;

/// Key the chart order is stored under.
pub const CHART_ORDER_KEY: &str = "chart_order";

/// Small key-value storage for opaque blobs.
#[cfg_attr(test, mockall::automock)]
pub trait OrderStore {
    /// Returns `None` when nothing was stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

impl<T: Deref> OrderStore for T
where
    T::Target: OrderStore,
{
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.deref().get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.deref().set(key, value)
    }
}

/// Stores every key in its own file.
pub struct FileOrderStore {
    dir: PathBuf,
}

impl FileOrderStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("Illegal store key {key:?}");
        }
        Ok(self.dir.join(key))
    }
}

impl OrderStore for FileOrderStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.key_path(key)?;
        match std::fs::read(&path) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.key_path(key)?;
        // Written next to the target and renamed, so readers never see half of a value
        let temporary = path.with_extension("tmp");
        std::fs::write(&temporary, value)?;
        std::fs::rename(&temporary, &path)?;
        debug!("Stored {} bytes under {key}", value.len());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryOrderStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl OrderStore for MemoryOrderStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .values
            .lock()
            .map_err(|_| anyhow!("Store lock was poisoned"))?
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| anyhow!("Store lock was poisoned"))?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{FileOrderStore, MemoryOrderStore, OrderStore, CHART_ORDER_KEY};

    fn check_store(store: &impl OrderStore) -> Result<()> {
        assert_eq!(store.get(CHART_ORDER_KEY)?, None);
        store.set(CHART_ORDER_KEY, b"first")?;
        store.set(CHART_ORDER_KEY, b"second")?;
        assert_eq!(store.get(CHART_ORDER_KEY)?, Some(b"second".to_vec()));
        store.set("other", b"")?;
        assert_eq!(store.get("other")?, Some(vec![]));
        Ok(())
    }

    #[test]
    fn file_store() -> Result<()> {
        let dir = tempdir()?;
        let store = FileOrderStore::new(dir.path().join("state"))?;
        check_store(&store)?;

        let reopened = FileOrderStore::new(dir.path().join("state"))?;
        assert_eq!(reopened.get(CHART_ORDER_KEY)?, Some(b"second".to_vec()));
        Ok(())
    }

    #[test]
    fn file_store_rejects_paths() -> Result<()> {
        let dir = tempdir()?;
        let store = FileOrderStore::new(dir.path().to_owned())?;
        assert!(store.set("../escape", b"value").is_err());
        assert!(store.get("").is_err());
        Ok(())
    }

    #[test]
    fn memory_store() -> Result<()> {
        check_store(&MemoryOrderStore::default())
    }
}
