use parking_lot::RwLock;
use spendview_core::CacheStore;
use spendview_domain::Result;

/// Process-local snapshot slot
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    slot: RwLock<Option<String>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.slot.read().clone())
    }

    fn write(&self, payload: &str) -> Result<()> {
        *self.slot.write() = Some(payload.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.slot.write().take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let store = MemoryCacheStore::new();
        assert_eq!(store.read().unwrap(), None);

        store.write("first").unwrap();
        store.write("second").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("second"));

        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }
}
