use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{instrument, warn};

use adgenius_core::{Ad, User};

use crate::database::Database;
use crate::error::StoreError;

/// Storage key for the current session user record.
pub const KEY_USER: &str = "adgenius_user";
/// Storage key for the ad collection.
pub const KEY_ADS: &str = "adgenius_ads";

/// Typed persistence over the key-value substrate.
///
/// Owns the serialized representation of exactly two named records: the
/// optional current user and the ordered ad collection. Every write
/// overwrites the whole value under its key; there are no partial or
/// merge semantics. A value that fails to parse is treated as absent,
/// not as a fatal error.
#[derive(Clone)]
pub struct EntityStore {
    db: Database,
}

impl EntityStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub fn read_user(&self) -> Result<Option<User>, StoreError> {
        self.read_record(KEY_USER)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub fn write_user(&self, user: &User) -> Result<(), StoreError> {
        self.write_record(KEY_USER, user)
    }

    /// Idempotent: clearing an absent user is not an error.
    #[instrument(skip(self))]
    pub fn clear_user(&self) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM kv WHERE key = ?1", [KEY_USER])?;
            Ok(())
        })
    }

    /// Ordered ad collection, newest first. Absent or unparseable data
    /// reads as an empty collection.
    #[instrument(skip(self))]
    pub fn read_ads(&self) -> Result<Vec<Ad>, StoreError> {
        Ok(self.read_record::<Vec<Ad>>(KEY_ADS)?.unwrap_or_default())
    }

    #[instrument(skip(self, ads), fields(count = ads.len()))]
    pub fn write_ads(&self, ads: &[Ad]) -> Result<(), StoreError> {
        self.write_record(KEY_ADS, &ads)
    }

    fn read_record<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, StoreError> {
        let raw = self.get_raw(key)?;
        match raw {
            None => Ok(None),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    // Malformed persisted data is recoverable: treat as absent.
                    warn!(key, error = %e, "malformed persisted record, treating as absent");
                    Ok(None)
                }
            },
        }
    }

    fn write_record<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, raw],
            )?;
            Ok(())
        })
    }

    fn get_raw(&self, key: &'static str) -> Result<Option<String>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
            let mut rows = stmt.query([key])?;
            match rows.next()? {
                Some(row) => Ok(Some(row.get(0)?)),
                None => Ok(None),
            }
        })
    }

    #[cfg(test)]
    fn put_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, value],
            )?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgenius_core::{AdId, AdStatus, UserId};

    fn store() -> EntityStore {
        EntityStore::new(Database::in_memory().unwrap())
    }

    fn ad(id: &str, title: &str) -> Ad {
        Ad {
            id: AdId::from_raw(id),
            title: title.into(),
            description: "desc".into(),
            image_url: "https://example.com/a.png".into(),
            status: AdStatus::Draft,
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_001,
        }
    }

    fn user() -> User {
        User {
            id: UserId::from_raw("user_1"),
            name: "jane".into(),
            email: "jane@example.com".into(),
            avatar: None,
        }
    }

    #[test]
    fn user_absent_initially() {
        assert!(store().read_user().unwrap().is_none());
    }

    #[test]
    fn user_write_read_roundtrip() {
        let store = store();
        let u = user();
        store.write_user(&u).unwrap();
        assert_eq!(store.read_user().unwrap(), Some(u));
    }

    #[test]
    fn user_write_overwrites() {
        let store = store();
        store.write_user(&user()).unwrap();
        let mut other = user();
        other.id = UserId::from_raw("user_2");
        other.email = "bob@example.com".into();
        store.write_user(&other).unwrap();
        assert_eq!(store.read_user().unwrap(), Some(other));
    }

    #[test]
    fn clear_user_is_idempotent() {
        let store = store();
        store.clear_user().unwrap();
        store.write_user(&user()).unwrap();
        store.clear_user().unwrap();
        store.clear_user().unwrap();
        assert!(store.read_user().unwrap().is_none());
    }

    #[test]
    fn ads_empty_initially() {
        assert!(store().read_ads().unwrap().is_empty());
    }

    #[test]
    fn ads_roundtrip_preserves_order() {
        let store = store();
        let ads = vec![ad("ad_b", "B"), ad("ad_a", "A")];
        store.write_ads(&ads).unwrap();
        assert_eq!(store.read_ads().unwrap(), ads);
    }

    #[test]
    fn ads_write_overwrites_whole_collection() {
        let store = store();
        store.write_ads(&[ad("ad_a", "A"), ad("ad_b", "B")]).unwrap();
        store.write_ads(&[ad("ad_c", "C")]).unwrap();
        let ads = store.read_ads().unwrap();
        assert_eq!(ads.len(), 1);
        assert_eq!(ads[0].title, "C");
    }

    #[test]
    fn malformed_ads_read_as_empty() {
        let store = store();
        store.put_raw(KEY_ADS, "{not json").unwrap();
        assert!(store.read_ads().unwrap().is_empty());
    }

    #[test]
    fn malformed_user_reads_as_absent() {
        let store = store();
        store.put_raw(KEY_USER, "[42]").unwrap();
        assert!(store.read_user().unwrap().is_none());
    }

    #[test]
    fn malformed_data_is_recoverable_by_write() {
        let store = store();
        store.put_raw(KEY_ADS, "garbage").unwrap();
        store.write_ads(&[ad("ad_a", "A")]).unwrap();
        assert_eq!(store.read_ads().unwrap().len(), 1);
    }

    #[test]
    fn persisted_layout_is_plain_json() {
        // The persisted value must be a plain JSON array of camelCase
        // objects so other readers of the same layout can parse it.
        let store = store();
        store.write_ads(&[ad("ad_a", "A")]).unwrap();
        let raw = store.get_raw(KEY_ADS).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["imageUrl"], "https://example.com/a.png");
    }
}
