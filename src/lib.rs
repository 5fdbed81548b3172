//! AdGenius core: durable session + campaign persistence and an
//! AI generation gateway for ad consoles.
//!
//! The [`App`] facade owns the single database handle and passes explicit
//! [`EntityStore`] handles to the session manager and campaign repository;
//! there is no hidden global state. UIs call the three subsystems and keep
//! read-only copies of whatever they render.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing::info;

pub use adgenius_campaigns::{CampaignError, CampaignRepo};
pub use adgenius_core::{Ad, AdDraft, AdId, AdPatch, AdStatus, User, UserId};
pub use adgenius_gen::{GeminiProvider, GenerationError, GenerationProvider, MockProvider};
pub use adgenius_session::{SessionError, SessionManager, DEFAULT_AUTH_DELAY};
pub use adgenius_store::{Database, EntityStore, StoreError};
pub use adgenius_telemetry::{init_telemetry, TelemetryConfig};

/// Application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Location of the entity store database.
    pub db_path: PathBuf,
    /// API key for the Gemini gateway. Without one the generator is
    /// unavailable and `generator()` returns `None`.
    pub gemini_api_key: Option<SecretString>,
    /// Simulated latency for login/register.
    pub auth_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: home_dir().join(".adgenius").join("adgenius.db"),
            gemini_api_key: None,
            auth_delay: DEFAULT_AUTH_DELAY,
        }
    }
}

/// Wires the entity store, session manager, campaign repository and
/// generation gateway together. Construct once at startup.
pub struct App {
    sessions: SessionManager,
    campaigns: CampaignRepo,
    generator: Option<Arc<dyn GenerationProvider>>,
}

impl App {
    /// Open (or create) the database at the configured path and build
    /// the subsystems around it.
    pub fn open(config: AppConfig) -> Result<Self, StoreError> {
        let db = Database::open(&config.db_path)?;
        Ok(Self::from_database(db, config))
    }

    /// In-memory app, nothing persisted across restarts. For tests.
    pub fn in_memory(config: AppConfig) -> Result<Self, StoreError> {
        let db = Database::in_memory()?;
        Ok(Self::from_database(db, config))
    }

    fn from_database(db: Database, config: AppConfig) -> Self {
        let store = EntityStore::new(db);
        let sessions = SessionManager::with_auth_delay(store.clone(), config.auth_delay);
        let campaigns = CampaignRepo::new(store);
        let generator: Option<Arc<dyn GenerationProvider>> = config
            .gemini_api_key
            .map(|key| Arc::new(GeminiProvider::new(key)) as Arc<dyn GenerationProvider>);

        if generator.is_none() {
            info!("no Gemini API key configured, generation gateway disabled");
        }

        Self {
            sessions,
            campaigns,
            generator,
        }
    }

    /// Swap the generation provider (tests use [`MockProvider`]).
    pub fn with_generator(mut self, generator: Arc<dyn GenerationProvider>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn campaigns(&self) -> &CampaignRepo {
        &self.campaigns
    }

    pub fn generator(&self) -> Option<&Arc<dyn GenerationProvider>> {
        self.generator.as_ref()
    }
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            auth_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    #[test]
    fn generator_absent_without_api_key() {
        let app = App::in_memory(test_config()).unwrap();
        assert!(app.generator().is_none());
    }

    #[test]
    fn generator_present_with_api_key() {
        let app = App::in_memory(AppConfig {
            gemini_api_key: Some(SecretString::from("test-key")),
            ..test_config()
        })
        .unwrap();
        assert_eq!(app.generator().unwrap().name(), "gemini");
    }

    #[test]
    fn with_generator_injects_mock() {
        let app = App::in_memory(test_config())
            .unwrap()
            .with_generator(Arc::new(MockProvider::replying("ad copy")));
        assert_eq!(app.generator().unwrap().name(), "mock");
    }

    #[test]
    fn default_config_db_path_under_home() {
        let config = AppConfig::default();
        assert!(config.db_path.ends_with(".adgenius/adgenius.db"));
    }
}
