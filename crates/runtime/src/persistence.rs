//! Persistence of the automatic shadow set.
//!
//! Owns the storage conventions around the core codec: an empty set is
//! represented by the key being absent, never by an empty blob, and a
//! missing or unparsable blob loads as an empty set. Corrupted state is
//! "no shadows", never an error the caller has to handle.

use shadow_core::{ShadowSet, decode_shadows, encode_shadows};

use crate::store::{ConfigStore, Result, StoreError};

/// Storage key for the serialized automatic shadow set. Matches the key
/// the original client wrote, so existing data loads unchanged.
pub const SHADOW_DATA_KEY: &str = "reservedSlotsData";

/// Writes the set under [`SHADOW_DATA_KEY`], or removes the key entirely
/// when the set is empty. Idempotent; redundant saves with identical
/// content are harmless.
pub fn save_shadows(store: &dyn ConfigStore, group: &str, shadows: &ShadowSet) -> Result<()> {
    if shadows.is_empty() {
        store.unset(group, SHADOW_DATA_KEY)?;
        tracing::debug!("cleared persisted shadow data; set is empty");
    } else {
        let blob = encode_shadows(shadows).map_err(|e| StoreError::Json(e.to_string()))?;
        store.set(group, SHADOW_DATA_KEY, &blob)?;
        tracing::debug!("saved {} shadows", shadows.len());
    }
    Ok(())
}

/// Loads the persisted set. Absent, empty, unreadable, or malformed data
/// all yield an empty set; failures are logged, never raised.
pub fn load_shadows(store: &dyn ConfigStore, group: &str) -> ShadowSet {
    let blob = match store.get(group, SHADOW_DATA_KEY) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            tracing::debug!("no persisted shadow data found");
            return ShadowSet::new();
        }
        Err(err) => {
            tracing::error!("failed to read persisted shadow data: {}", err);
            return ShadowSet::new();
        }
    };

    if blob.is_empty() {
        return ShadowSet::new();
    }

    match decode_shadows(&blob) {
        Ok(shadows) => {
            tracing::debug!("loaded {} shadows", shadows.len());
            shadows
        }
        Err(err) => {
            tracing::error!("corrupted shadow data, starting empty: {}", err);
            ShadowSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryConfigStore;
    use shadow_core::ItemId;

    const GROUP: &str = "slotshadow";

    #[test]
    fn non_empty_set_round_trips_through_the_store() {
        let store = InMemoryConfigStore::new();
        let shadows: ShadowSet = [(3, ItemId(995)), (7, ItemId(42))].into_iter().collect();

        save_shadows(&store, GROUP, &shadows).unwrap();

        assert_eq!(load_shadows(&store, GROUP), shadows);
    }

    #[test]
    fn empty_set_removes_the_stored_key() {
        let store = InMemoryConfigStore::new();
        let shadows: ShadowSet = [(3, ItemId(995))].into_iter().collect();
        save_shadows(&store, GROUP, &shadows).unwrap();

        save_shadows(&store, GROUP, &ShadowSet::new()).unwrap();

        assert_eq!(store.get(GROUP, SHADOW_DATA_KEY).unwrap(), None);
        assert!(load_shadows(&store, GROUP).is_empty());
    }

    #[test]
    fn corrupted_blob_loads_as_empty() {
        let store = InMemoryConfigStore::new();
        store.set(GROUP, SHADOW_DATA_KEY, "{garbage").unwrap();

        assert!(load_shadows(&store, GROUP).is_empty());
    }

    #[test]
    fn empty_blob_loads_as_empty() {
        let store = InMemoryConfigStore::new();
        store.set(GROUP, SHADOW_DATA_KEY, "").unwrap();

        assert!(load_shadows(&store, GROUP).is_empty());
    }
}
