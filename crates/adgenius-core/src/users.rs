use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// The authenticated identity. At most one is persisted at a time
/// (the current session slot); logout removes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
