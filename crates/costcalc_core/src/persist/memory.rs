//! In-memory durable store with an optional byte quota.

use crate::persist::{DurableError, DurableResult, DurableStore};
use std::collections::BTreeMap;

/// Map-backed [`DurableStore`].
///
/// The quota counts key plus value bytes across all entries. A write that
/// would exceed it fails and leaves the previous value in place.
#[derive(Debug, Clone, Default)]
pub struct MemoryDurableStore {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl DurableStore for MemoryDurableStore {
    fn load(&self, key: &str) -> DurableResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> DurableResult<()> {
        if let Some(quota) = self.quota_bytes {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |old| key.len() + old.len());
            let required = self.used_bytes() - replaced + key.len() + value.len();
            if required > quota {
                return Err(DurableError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    quota,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DurableResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryDurableStore;
    use crate::persist::{DurableError, DurableStore};

    #[test]
    fn quota_rejects_oversized_write_and_keeps_previous_value() {
        let mut store = MemoryDurableStore::with_quota(16);
        store.save("people", "[]").unwrap();

        let err = store.save("people", "[0123456789]").unwrap_err();
        assert!(matches!(err, DurableError::QuotaExceeded { quota: 16, .. }));
        assert_eq!(store.get("people"), Some("[]"));
    }

    #[test]
    fn overwrite_counts_only_the_new_value() {
        let mut store = MemoryDurableStore::with_quota(10);
        store.save("k", "123456789").unwrap();
        store.save("k", "987654321").unwrap();
        assert_eq!(store.used_bytes(), 10);
    }
}
