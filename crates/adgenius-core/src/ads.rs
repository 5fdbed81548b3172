use serde::{Deserialize, Serialize};

use crate::ids::AdId;

/// Lifecycle status of a campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdStatus {
    Active,
    Draft,
    Paused,
}

/// A single advertisement campaign.
///
/// `image_url` is either a remote URL or an inline
/// `data:image/png;base64,...` payload. Timestamps are epoch milliseconds;
/// `updated_at >= created_at` always, and `updated_at` strictly increases
/// on every mutation of the record.
///
/// Field names serialize camelCase to match the persisted layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: AdId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub status: AdStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input fields for creating a campaign. Id and timestamps are assigned
/// by the repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdDraft {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub status: AdStatus,
}

/// Partial update for a campaign. `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<AdStatus>,
}

impl AdPatch {
    /// Merge the set fields over an existing record. Timestamps are the
    /// repository's responsibility, not the patch's.
    pub fn apply_to(&self, ad: &mut Ad) {
        if let Some(title) = &self.title {
            ad.title = title.clone();
        }
        if let Some(description) = &self.description {
            ad.description = description.clone();
        }
        if let Some(image_url) = &self.image_url {
            ad.image_url = image_url.clone();
        }
        if let Some(status) = self.status {
            ad.status = status;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.status.is_none()
    }
}
