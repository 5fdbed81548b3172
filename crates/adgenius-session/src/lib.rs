use std::time::Duration;

use tracing::{info, instrument};

use adgenius_core::{User, UserId};
use adgenius_store::{EntityStore, StoreError};

/// Simulated network latency for login/register, matching the original
/// console's UX. Tests construct the manager with `Duration::ZERO`.
pub const DEFAULT_AUTH_DELAY: Duration = Duration::from_millis(800);

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Message is shown verbatim by the UI, so it states the mock rule.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Login/logout/registration as transitions over the single persisted
/// session slot. Anonymous vs. Authenticated is implicit in whether the
/// slot holds a user.
///
/// Authentication is a deliberate mock: any well-formed email plus a
/// 6+ character password is accepted. The validation lives in one place
/// so a real credential backend can replace it without touching callers.
pub struct SessionManager {
    store: EntityStore,
    auth_delay: Duration,
}

impl SessionManager {
    pub fn new(store: EntityStore) -> Self {
        Self::with_auth_delay(store, DEFAULT_AUTH_DELAY)
    }

    pub fn with_auth_delay(store: EntityStore, auth_delay: Duration) -> Self {
        Self { store, auth_delay }
    }

    /// Validate credentials and open a session. Persists nothing on
    /// failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        validate_credentials(email, password)?;

        tokio::time::sleep(self.auth_delay).await;

        let user = User {
            id: UserId::new(),
            name: display_name(email),
            email: email.to_owned(),
            avatar: Some(avatar_url(email)),
        };
        self.store.write_user(&user)?;
        info!(user_id = %user.id, "session opened");
        Ok(user)
    }

    /// Create an account and open a session. Unconditional: there is a
    /// single session slot and no account book, so no uniqueness check —
    /// a repeat registration simply replaces the current slot.
    #[instrument(skip(self, _password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> Result<User, SessionError> {
        tokio::time::sleep(self.auth_delay).await;

        let user = User {
            id: UserId::new(),
            name: name.to_owned(),
            email: email.to_owned(),
            avatar: Some(avatar_url(email)),
        };
        self.store.write_user(&user)?;
        info!(user_id = %user.id, "account registered");
        Ok(user)
    }

    /// Close the session. Idempotent.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.clear_user()?;
        Ok(())
    }

    /// The persisted session, if any. Used at startup to restore state;
    /// does not transition anything.
    pub fn current_session(&self) -> Result<Option<User>, SessionError> {
        Ok(self.store.read_user()?)
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), SessionError> {
    if email.contains('@') && password.chars().count() >= MIN_PASSWORD_LEN {
        return Ok(());
    }
    Err(SessionError::InvalidCredentials(
        "mock auth: use any email containing '@' and a password of 6+ characters".into(),
    ))
}

/// Display name derived from the email's local part.
fn display_name(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_owned()
}

/// Deterministic avatar from the DiceBear service, keyed by email.
fn avatar_url(email: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={email}")
}
