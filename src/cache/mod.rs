//! Device-local address persistence
//!
//! A string-keyed store holds JSON blobs under fixed keys. Reads never fail:
//! missing, unreadable and corrupt entries all come back as "nothing saved".
//! There is no locking; concurrent writers race and the last write wins.

mod store;

use serde::{de::DeserializeOwned, Serialize};

use crate::address::{self, Address, SavedAddress};
use crate::error::Error;

pub use store::*;

/// Key of the current delivery address
pub const CURRENT_ADDRESS_KEY: &str = "userAddress";

/// Key of the saved-address list
pub const SAVED_ADDRESSES_KEY: &str = "savedAddresses";

/// Key set once the first-launch location setup has completed
pub const LOCATION_SETUP_KEY: &str = "hasCompletedLocationSetup";

/// Current and saved addresses on top of a [`KeyValueStore`]
pub struct AddressCache<S> {
    store: S,
}

impl<S: KeyValueStore> AddressCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("reading {} failed: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring corrupt {}: {}", key, e);
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), Error> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw).await
    }

    pub async fn get_current_address(&self) -> Option<Address> {
        self.read(CURRENT_ADDRESS_KEY).await
    }

    /// The current address, or the "tap to set" placeholder
    pub async fn current_address_or_placeholder(&self) -> Address {
        self.get_current_address()
            .await
            .unwrap_or_else(Address::placeholder)
    }

    pub async fn set_current_address(&self, address: &Address) -> Result<(), Error> {
        self.write(CURRENT_ADDRESS_KEY, address).await?;
        log::info!("current address set to {:?}", address.label);
        Ok(())
    }

    pub async fn get_saved_addresses(&self) -> Vec<SavedAddress> {
        self.read(SAVED_ADDRESSES_KEY).await.unwrap_or_default()
    }

    pub async fn set_saved_addresses(&self, addresses: &[SavedAddress]) -> Result<(), Error> {
        self.write(SAVED_ADDRESSES_KEY, addresses).await
    }

    /// Append an address to the saved list, optionally making it the default
    /// (and therefore the current address).
    pub async fn add_saved_address(
        &self,
        address: Address,
        make_default: bool,
    ) -> Result<SavedAddress, Error> {
        let mut list = self.get_saved_addresses().await;
        let entry = SavedAddress::new(address);
        let id = entry.id.clone();
        list.push(entry);

        if make_default {
            address::mark_default(&mut list, &id)?;
        }
        self.set_saved_addresses(&list).await?;

        let entry = list
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found(format!("saved address {}", id)))?;
        if make_default {
            self.set_current_address(&entry.address).await?;
        }
        Ok(entry)
    }

    /// Make the saved entry `id` the current address and the only default.
    /// The list is written before the current address.
    pub async fn set_as_default(&self, id: &str) -> Result<SavedAddress, Error> {
        let mut list = self.get_saved_addresses().await;
        address::mark_default(&mut list, id)?;

        let entry = list
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("saved address {}", id)))?;

        self.set_saved_addresses(&list).await?;
        self.set_current_address(&entry.address).await?;
        log::info!("default address is now {}", id);
        Ok(entry)
    }

    /// Delete a saved entry. Returns whether anything was removed.
    pub async fn delete_saved_address(&self, id: &str) -> Result<bool, Error> {
        let mut list = self.get_saved_addresses().await;
        if address::remove_by_id(&mut list, id).is_none() {
            return Ok(false);
        }
        self.set_saved_addresses(&list).await?;
        Ok(true)
    }

    /// First launch, or the setup was never finished
    pub async fn needs_location_setup(&self) -> bool {
        let completed = matches!(self.store.get(LOCATION_SETUP_KEY).await, Ok(Some(_)));
        !completed || self.get_current_address().await.is_none()
    }

    pub async fn mark_location_setup_complete(&self) -> Result<(), Error> {
        self.store.set(LOCATION_SETUP_KEY, "true").await
    }

    /// Drop everything stored on the device
    pub async fn clear(&self) -> Result<(), Error> {
        self.store.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Coordinates;

    fn address(label: &str) -> Address {
        Address {
            label: label.to_string(),
            street: format!("{} street", label),
            flat_number: "1".to_string(),
            coordinates: Some(Coordinates::new(28.6, 77.2)),
            ..Default::default()
        }
    }

    fn cache() -> AddressCache<MemoryStore> {
        AddressCache::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_absent_current_address_uses_placeholder() {
        let cache = cache();
        assert!(cache.get_current_address().await.is_none());
        assert_eq!(
            cache.current_address_or_placeholder().await,
            Address::placeholder()
        );
    }

    #[tokio::test]
    async fn test_corrupt_json_reads_as_absent() {
        let cache = cache();
        cache.store().set(CURRENT_ADDRESS_KEY, "{not json").await.unwrap();
        cache.store().set(SAVED_ADDRESSES_KEY, "42").await.unwrap();

        assert!(cache.get_current_address().await.is_none());
        assert!(cache.get_saved_addresses().await.is_empty());
    }

    #[tokio::test]
    async fn test_current_address_roundtrip() {
        let cache = cache();
        let home = address("Home");
        cache.set_current_address(&home).await.unwrap();
        assert_eq!(cache.get_current_address().await, Some(home));
    }

    #[tokio::test]
    async fn test_set_as_default() {
        let cache = cache();
        let a = cache.add_saved_address(address("Home"), true).await.unwrap();
        let b = cache.add_saved_address(address("Work"), false).await.unwrap();
        let c = cache.add_saved_address(address("Gym"), false).await.unwrap();

        let chosen = cache.set_as_default(&b.id).await.unwrap();
        assert_eq!(chosen.id, b.id);

        let list = cache.get_saved_addresses().await;
        let defaults: Vec<_> = list.iter().filter(|s| s.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, b.id);
        assert_eq!(
            list.iter().map(|s| s.id.clone()).collect::<Vec<_>>(),
            vec![a.id, b.id, c.id]
        );
        assert_eq!(cache.get_current_address().await, Some(address("Work")));
    }

    #[tokio::test]
    async fn test_set_as_default_unknown_id() {
        let cache = cache();
        cache.add_saved_address(address("Home"), true).await.unwrap();

        assert!(matches!(
            cache.set_as_default("missing").await,
            Err(Error::NotFound(_))
        ));
        assert_eq!(cache.get_current_address().await, Some(address("Home")));
    }

    /// Memory store refusing writes to one key
    struct ReadOnlyKey {
        inner: MemoryStore,
        key: &'static str,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for ReadOnlyKey {
        async fn get(&self, key: &str) -> Result<Option<String>, Error> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
            if key == self.key {
                return Err(Error::storage(format!("{} is read-only", key)));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), Error> {
            self.inner.remove(key).await
        }

        async fn clear(&self) -> Result<(), Error> {
            self.inner.clear().await
        }
    }

    #[tokio::test]
    async fn test_set_as_default_failed_list_write_keeps_current() {
        let seeded = cache();
        seeded.add_saved_address(address("Home"), true).await.unwrap();
        let work = seeded.add_saved_address(address("Work"), false).await.unwrap();

        let inner = MemoryStore::new();
        for key in [CURRENT_ADDRESS_KEY, SAVED_ADDRESSES_KEY] {
            if let Some(raw) = seeded.store().get(key).await.unwrap() {
                inner.set(key, &raw).await.unwrap();
            }
        }
        let cache = AddressCache::new(ReadOnlyKey {
            inner,
            key: SAVED_ADDRESSES_KEY,
        });

        assert!(matches!(
            cache.set_as_default(&work.id).await,
            Err(Error::Storage(_))
        ));
        assert_eq!(cache.get_current_address().await, Some(address("Home")));
    }

    #[tokio::test]
    async fn test_delete_keeps_other_entries() {
        let cache = cache();
        let a = cache.add_saved_address(address("Home"), false).await.unwrap();
        let b = cache.add_saved_address(address("Work"), true).await.unwrap();
        let c = cache.add_saved_address(address("Gym"), false).await.unwrap();
        let before = cache.get_saved_addresses().await;

        assert!(cache.delete_saved_address(&a.id).await.unwrap());
        assert!(!cache.delete_saved_address(&a.id).await.unwrap());

        let after = cache.get_saved_addresses().await;
        assert_eq!(after, before[1..].to_vec());
        assert!(after.iter().any(|s| s.id == b.id && s.is_default));
        assert!(after.iter().any(|s| s.id == c.id && !s.is_default));
    }

    #[tokio::test]
    async fn test_location_setup_flag() {
        let cache = cache();
        assert!(cache.needs_location_setup().await);

        cache.mark_location_setup_complete().await.unwrap();
        assert!(cache.needs_location_setup().await);

        cache.set_current_address(&address("Home")).await.unwrap();
        assert!(!cache.needs_location_setup().await);

        cache.clear().await.unwrap();
        assert!(cache.needs_location_setup().await);
        assert!(cache.get_saved_addresses().await.is_empty());
    }
}
