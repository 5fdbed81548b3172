pub mod database;
pub mod entities;
pub mod error;
pub mod schema;

pub use database::Database;
pub use entities::EntityStore;
pub use error::StoreError;
