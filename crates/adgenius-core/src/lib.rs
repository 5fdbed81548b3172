pub mod ads;
pub mod ids;
pub mod time;
pub mod users;

pub use ads::{Ad, AdDraft, AdPatch, AdStatus};
pub use ids::{AdId, UserId};
pub use users::User;
