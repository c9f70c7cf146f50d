//! Snapshot persistence for the car collection.
//!
//! The collection is persisted as one JSON array under one key. It is read
//! once at startup and overwritten wholesale after every mutation.

use std::cell::RefCell;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::car::{self, Car};
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Default key the collection snapshot is stored under.
pub const DEFAULT_SNAPSHOT_KEY: &str = "cars";

/// Somewhere the whole car collection can be saved and loaded.
pub trait SnapshotStore {
    /// Load the saved collection, or `None` if nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptSnapshot`] if the saved value is not a car
    /// list, or a storage error if it cannot be read.
    fn load(&self) -> Result<Option<Vec<Car>>>;

    /// Replace the saved collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be serialized or written.
    fn save(&self, cars: &[Car]) -> Result<()>;
}

/// Parse a serialized snapshot, skipping entries that are not usable cars.
///
/// # Errors
///
/// Returns [`Error::CorruptSnapshot`] if `json` is not a JSON array.
pub fn decode_snapshot(key: &str, json: &str) -> Result<Vec<Car>> {
    let entries: Vec<Value> =
        serde_json::from_str(json).map_err(|source| Error::CorruptSnapshot {
            key: key.to_string(),
            source,
        })?;
    Ok(car::cars_from_values(&format!("snapshot '{key}'"), entries))
}

/// Serialize a collection for storage.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_snapshot(cars: &[Car]) -> Result<String> {
    Ok(serde_json::to_string(cars)?)
}

/// A [`SnapshotStore`] backed by a [`Storage`] database.
#[derive(Debug)]
pub struct CarStore {
    storage: Storage,
    key: String,
}

impl CarStore {
    /// Store the collection under `key` in `storage`.
    #[must_use]
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The snapshot key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// When the snapshot was last written, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.storage.get(&self.key)?.and_then(|s| s.updated_at))
    }

    /// Delete the snapshot so the next start re-seeds.
    ///
    /// Returns `true` if a snapshot was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<bool> {
        self.storage.remove(&self.key)
    }
}

impl SnapshotStore for CarStore {
    fn load(&self) -> Result<Option<Vec<Car>>> {
        match self.storage.get(&self.key)? {
            Some(snapshot) => decode_snapshot(&self.key, &snapshot.value).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, cars: &[Car]) -> Result<()> {
        self.storage.put(&self.key, &encode_snapshot(cars)?)
    }
}

/// A [`SnapshotStore`] that keeps the serialized snapshot in memory.
///
/// Useful when nothing should outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RefCell<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a raw serialized snapshot.
    #[must_use]
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            value: RefCell::new(Some(json.into())),
        }
    }

    /// The raw serialized snapshot, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.value.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Car>>> {
        match self.value.borrow().as_deref() {
            Some(json) => decode_snapshot(DEFAULT_SNAPSHOT_KEY, json).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, cars: &[Car]) -> Result<()> {
        *self.value.borrow_mut() = Some(encode_snapshot(cars)?);
        Ok(())
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn load(&self) -> Result<Option<Vec<Car>>> {
        (**self).load()
    }

    fn save(&self, cars: &[Car]) -> Result<()> {
        (**self).save(cars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::FieldValue;

    fn cars() -> Vec<Car> {
        vec![
            Car {
                vin: "A".to_string(),
                price: FieldValue::from(100),
                ..Car::default()
            },
            Car {
                vin: "B".to_string(),
                color: "Maroon".to_string(),
                ..Car::default()
            },
        ]
    }

    fn car_store() -> CarStore {
        CarStore::new(Storage::open_in_memory().unwrap(), DEFAULT_SNAPSHOT_KEY)
    }

    #[test]
    fn test_car_store_empty() {
        assert!(car_store().load().unwrap().is_none());
    }

    #[test]
    fn test_car_store_round_trip() {
        let store = car_store();
        store.save(&cars()).unwrap();

        assert_eq!(store.load().unwrap(), Some(cars()));
        assert!(store.updated_at().unwrap().is_some());
    }

    #[test]
    fn test_car_store_empty_list_is_not_absent() {
        let store = car_store();
        store.save(&[]).unwrap();

        assert_eq!(store.load().unwrap(), Some(Vec::new()));
        assert_eq!(store.storage().get("cars").unwrap().unwrap().value, "[]");
    }

    #[test]
    fn test_car_store_clear() {
        let store = car_store();
        store.save(&cars()).unwrap();

        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_snapshot() {
        let store = car_store();
        store.storage().put(store.key(), "{not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::CorruptSnapshot { ref key, .. } if key == "cars"));
    }

    #[test]
    fn test_decode_skips_nulls() {
        let cars = decode_snapshot("cars", r#"[null, {"car_vin": "A"}, null]"#).unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].vin, "A");
    }

    #[test]
    fn test_decode_keeps_good_entries() {
        let cars =
            decode_snapshot("cars", r#"[{"car_vin":"A"},{"car":7,"car_vin":"B"},"junk"]"#).unwrap();

        assert_eq!(cars.len(), 2);
        assert_eq!(cars[1].company, "7");
        assert_eq!(cars[1].vin, "B");
    }

    #[test]
    fn test_decode_non_array_is_corrupt() {
        let err = decode_snapshot("cars", r#"{"cars": []}"#).unwrap_err();
        assert!(matches!(err, Error::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&cars()).unwrap();
        assert_eq!(store.load().unwrap(), Some(cars()));
        assert!(store.raw().unwrap().contains("\"car_vin\":\"A\""));
    }

    #[test]
    fn test_store_by_reference() {
        let store = MemoryStore::new();
        let by_ref = &store;
        by_ref.save(&cars()).unwrap();
        assert_eq!(store.load().unwrap().map(|c| c.len()), Some(2));
    }
}
