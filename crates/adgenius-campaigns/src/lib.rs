use tracing::{info, instrument};

use adgenius_core::time::now_ms;
use adgenius_core::{Ad, AdDraft, AdId, AdPatch};
use adgenius_store::{EntityStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error("campaign not found: {0}")]
    NotFound(AdId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// CRUD over the ad collection. Each mutation reads the whole collection,
/// applies the change, and writes the whole collection back — matching
/// the store's overwrite-only contract. Search and filtering are a
/// presentation concern over `list()`, not part of this layer.
pub struct CampaignRepo {
    store: EntityStore,
}

impl CampaignRepo {
    pub fn new(store: EntityStore) -> Self {
        Self { store }
    }

    /// All campaigns, insertion order, newest first.
    pub fn list(&self) -> Result<Vec<Ad>, CampaignError> {
        Ok(self.store.read_ads()?)
    }

    /// Create a campaign and prepend it so the newest shows first.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub fn create(&self, draft: AdDraft) -> Result<Ad, CampaignError> {
        let now = now_ms();
        let ad = Ad {
            id: AdId::new(),
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            status: draft.status,
            created_at: now,
            updated_at: now,
        };

        let mut ads = self.store.read_ads()?;
        ads.insert(0, ad.clone());
        self.store.write_ads(&ads)?;

        info!(ad_id = %ad.id, "campaign created");
        Ok(ad)
    }

    /// Merge a partial update over an existing campaign. Fails with
    /// `NotFound` (collection untouched) when the id is absent.
    #[instrument(skip(self, patch), fields(ad_id = %id))]
    pub fn update(&self, id: &AdId, patch: AdPatch) -> Result<Ad, CampaignError> {
        let mut ads = self.store.read_ads()?;
        let ad = ads
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| CampaignError::NotFound(id.clone()))?;

        patch.apply_to(ad);
        // Clamp to strictly-after the previous value so back-to-back
        // updates within one millisecond still advance the timestamp.
        ad.updated_at = now_ms().max(ad.updated_at + 1);
        let updated = ad.clone();

        self.store.write_ads(&ads)?;
        Ok(updated)
    }

    /// Remove a campaign. Deleting an absent id is a silent no-op.
    #[instrument(skip(self), fields(ad_id = %id))]
    pub fn delete(&self, id: &AdId) -> Result<(), CampaignError> {
        let mut ads = self.store.read_ads()?;
        let before = ads.len();
        ads.retain(|a| &a.id != id);
        if ads.len() != before {
            self.store.write_ads(&ads)?;
            info!(ad_id = %id, "campaign deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgenius_core::AdStatus;
    use adgenius_store::Database;

    fn repo() -> CampaignRepo {
        CampaignRepo::new(EntityStore::new(Database::in_memory().unwrap()))
    }

    fn draft(title: &str) -> AdDraft {
        AdDraft {
            title: title.into(),
            description: "Buy it".into(),
            image_url: "https://example.com/p.png".into(),
            status: AdStatus::Active,
        }
    }

    #[test]
    fn create_then_list_contains_the_ad() {
        let repo = repo();
        let ad = repo.create(draft("Mouse")).unwrap();
        assert_eq!(ad.title, "Mouse");
        assert_eq!(ad.description, "Buy it");
        assert_eq!(ad.status, AdStatus::Active);
        assert_eq!(ad.created_at, ad.updated_at);

        let ads = repo.list().unwrap();
        assert_eq!(ads, vec![ad]);
    }

    #[test]
    fn create_prepends_newest_first() {
        let repo = repo();
        let a = repo.create(draft("Mouse")).unwrap();
        let b = repo.create(draft("Keyboard")).unwrap();
        let ads = repo.list().unwrap();
        assert_eq!(ads, vec![b.clone(), a.clone()]);

        repo.delete(&a.id).unwrap();
        assert_eq!(repo.list().unwrap(), vec![b]);
    }

    #[test]
    fn create_assigns_unique_ids() {
        let repo = repo();
        let a = repo.create(draft("A")).unwrap();
        let b = repo.create(draft("B")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn update_changes_only_patched_fields() {
        let repo = repo();
        let ad = repo.create(draft("Mouse")).unwrap();

        let patch = AdPatch {
            status: Some(AdStatus::Paused),
            ..Default::default()
        };
        let updated = repo.update(&ad.id, patch).unwrap();

        assert_eq!(updated.status, AdStatus::Paused);
        assert_eq!(updated.title, ad.title);
        assert_eq!(updated.description, ad.description);
        assert_eq!(updated.image_url, ad.image_url);
        assert_eq!(updated.created_at, ad.created_at);
        assert!(updated.updated_at > ad.updated_at);
    }

    #[test]
    fn update_leaves_other_ads_untouched() {
        let repo = repo();
        let a = repo.create(draft("A")).unwrap();
        let b = repo.create(draft("B")).unwrap();

        repo.update(
            &a.id,
            AdPatch {
                title: Some("A2".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let ads = repo.list().unwrap();
        let stored_b = ads.iter().find(|x| x.id == b.id).unwrap();
        assert_eq!(stored_b, &b);
    }

    #[test]
    fn update_missing_id_fails_and_collection_unchanged() {
        let repo = repo();
        let a = repo.create(draft("A")).unwrap();
        let before = repo.list().unwrap();

        let result = repo.update(&AdId::from_raw("ad_missing"), AdPatch::default());
        assert!(matches!(result, Err(CampaignError::NotFound(_))));
        assert_eq!(repo.list().unwrap(), before);
        assert_eq!(before[0], a);
    }

    #[test]
    fn update_is_persisted() {
        let repo = repo();
        let ad = repo.create(draft("Mouse")).unwrap();
        repo.update(
            &ad.id,
            AdPatch {
                description: Some("Now cheaper".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(repo.list().unwrap()[0].description, "Now cheaper");
    }

    #[test]
    fn repeated_updates_strictly_advance_updated_at() {
        let repo = repo();
        let ad = repo.create(draft("Mouse")).unwrap();
        let first = repo.update(&ad.id, AdPatch::default()).unwrap();
        let second = repo.update(&ad.id, AdPatch::default()).unwrap();
        assert!(first.updated_at > ad.updated_at);
        assert!(second.updated_at > first.updated_at);
        assert!(second.updated_at >= second.created_at);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let repo = repo();
        let a = repo.create(draft("A")).unwrap();
        let b = repo.create(draft("B")).unwrap();
        repo.delete(&a.id).unwrap();
        let ads = repo.list().unwrap();
        assert_eq!(ads.len(), 1);
        assert_eq!(ads[0].id, b.id);
    }

    #[test]
    fn delete_missing_id_is_silent_noop() {
        let repo = repo();
        repo.create(draft("A")).unwrap();
        let before = repo.list().unwrap();
        repo.delete(&AdId::from_raw("ad_missing")).unwrap();
        assert_eq!(repo.list().unwrap(), before);
    }
}
