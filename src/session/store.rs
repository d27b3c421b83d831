use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::state::{Identity, PersistedUser, Profile, Session};
use super::validation::{validate_credentials, validate_password_change};
use crate::constants::{DARK_MODE_KEY, DEFAULT_DARK_MODE, LOCALE_KEY, USER_KEY};
use crate::gateway::{Backend, Credentials, LoginReply, PasswordChange, UserRecord};
use crate::i18n::Locale;
use crate::storage::{load_json, remove_key, save_json, KeyValueStore};
use crate::utils::{PartnerError, ValidationError};

/// Single owner of the session; every mutation goes through here so memory and
/// storage move together.
///
/// Persistence writes finish before a method returns. A failed write is logged and
/// does not fail the operation.
pub struct SessionStore {
    backend: Arc<dyn Backend>,
    storage: Arc<dyn KeyValueStore>,
    session: Session,
    last_error: Option<String>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn Backend>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            storage,
            session: Session::default(),
            last_error: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Message recorded by the last failed identity refresh
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Cold start: read each persisted key on its own, defaulting what is missing
    pub fn restore(&mut self) -> &Session {
        let storage = self.storage.as_ref();

        match load_json::<PersistedUser>(storage, USER_KEY).and_then(Identity::from_persisted) {
            Some(identity) => self.session.set_identity(identity),
            None => self.session.clear_identity(),
        }

        let locale = match load_json::<Value>(storage, LOCALE_KEY) {
            Some(Value::String(tag)) if !tag.is_empty() => Locale::new(tag),
            _ => Locale::default(),
        };
        self.session.set_locale(locale);

        let dark_mode = load_json::<Value>(storage, DARK_MODE_KEY)
            .and_then(|value| flag(&value))
            .unwrap_or(DEFAULT_DARK_MODE);
        self.session.set_dark_mode(dark_mode);

        debug!(
            "Restored session (logged in: {}, locale: {:?}, dark mode: {})",
            self.session.is_logged_in(),
            self.session.locale(),
            self.session.dark_mode()
        );
        &self.session
    }

    /// Authenticate and replace the identity with the server's
    ///
    /// Validation failures return before any request. Any other failure leaves the
    /// session logged out and deletes the persisted `user`, so a failed re-login does
    /// not come back on the next cold start.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<&Session, PartnerError> {
        validate_credentials(credentials)?;

        let reply = match self.backend.login(credentials).await {
            Ok(reply) => reply,
            Err(e) if e.status() == Some(401) => {
                info!("Login rejected for '{}'", credentials.username);
                self.reset_identity();
                return Err(PartnerError::InvalidCredentials);
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.reset_identity();
                return Err(PartnerError::Internal);
            }
        };

        if !reply.is_accepted() {
            warn!("Login refused by backend (status {})", reply.status);
            self.reset_identity();
            return Err(PartnerError::Internal);
        }

        let LoginReply { token, user, .. } = reply.body;
        let (Some(token), Some(user)) = (token, user) else {
            warn!("Login reply is missing token or user");
            self.reset_identity();
            return Err(PartnerError::Internal);
        };
        let Some(identity) = Identity::new(token, Profile::from(&user)) else {
            warn!("Login reply carried an empty token");
            self.reset_identity();
            return Err(PartnerError::Internal);
        };

        info!("Logged in as '{}'", credentials.username);
        self.adopt(identity, &user);
        Ok(&self.session)
    }

    /// Drop the session now and tell the backend in the background
    ///
    /// The notification's outcome is only logged. The returned handle may be awaited
    /// or dropped; nothing is sent when there was no token or no runtime.
    pub fn logout(&mut self) -> Option<JoinHandle<()>> {
        let token = self.session.token().map(str::to_string);
        self.session.clear_identity();
        remove_key(self.storage.as_ref(), USER_KEY);

        let token = token?;
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("No async runtime, skipping logout notification");
                return None;
            }
        };

        let backend = Arc::clone(&self.backend);
        Some(runtime.spawn(async move {
            match backend.logout(&token).await {
                Ok(()) => debug!("Logout acknowledged"),
                Err(e) => warn!("Logout notification failed: {}", e),
            }
        }))
    }

    /// Re-fetch identity with the held token, keeping that token
    ///
    /// On failure the session is cleared, the persisted `user` is deleted and the
    /// message is kept in `last_error`.
    pub async fn refresh_identity(&mut self) -> Result<&Session, PartnerError> {
        let Some(token) = self.session.token().map(str::to_string) else {
            return Err(PartnerError::NotLoggedIn);
        };

        let outcome = match self.backend.fetch_user(&token).await {
            Ok(reply) => reply.into_accepted(),
            Err(e) => {
                warn!("Identity refresh failed: {}", e);
                Err(PartnerError::Internal)
            }
        };

        let body = match outcome {
            Ok(body) => body,
            Err(err) => {
                self.reset_identity();
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        match Identity::new(token, Profile::from(&body.user)) {
            Some(identity) => self.adopt(identity, &body.user),
            None => self.reset_identity(),
        }
        self.last_error = None;
        Ok(&self.session)
    }

    /// Switch UI language; logged-in users also update their account
    pub async fn change_locale(&mut self, tag: &str) -> Result<Locale, PartnerError> {
        let locale = Locale::parse(tag).ok_or(ValidationError::InvalidLocale)?;

        if let Some(token) = self.session.token() {
            self.backend
                .change_locale(token, &locale)
                .await
                .map_err(|e| {
                    warn!("Language change failed: {}", e);
                    PartnerError::from(e)
                })?
                .into_accepted()?;
        }

        self.set_locale(locale.clone());
        Ok(locale)
    }

    /// Switch theme; logged-in users also update their account
    pub async fn change_theme(&mut self, dark_mode: bool) -> Result<(), PartnerError> {
        if let Some(token) = self.session.token() {
            self.backend
                .change_theme(token, dark_mode)
                .await
                .map_err(|e| {
                    warn!("Theme change failed: {}", e);
                    PartnerError::from(e)
                })?
                .into_accepted()?;
        }

        self.set_dark_mode(dark_mode);
        Ok(())
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), PartnerError> {
        validate_password_change(change)?;
        let token = self.session.token().ok_or(PartnerError::NotLoggedIn)?;

        self.backend
            .change_password(token, change)
            .await
            .map_err(|e| {
                warn!("Password change failed: {}", e);
                PartnerError::from(e)
            })?
            .into_accepted()?;
        Ok(())
    }

    /// Install a fresh identity plus the locale and theme that came with it
    fn adopt(&mut self, identity: Identity, user: &UserRecord) {
        save_json(self.storage.as_ref(), USER_KEY, &identity.to_persisted());
        self.session.set_identity(identity);

        let locale = user
            .locale
            .as_deref()
            .filter(|tag| !tag.is_empty())
            .map(Locale::new)
            .or_else(|| self.session.locale().cloned())
            .unwrap_or_default();
        self.set_locale(locale);

        let dark_mode = user.dark_mode.unwrap_or(self.session.dark_mode());
        self.set_dark_mode(dark_mode);
    }

    fn reset_identity(&mut self) {
        self.session.clear_identity();
        remove_key(self.storage.as_ref(), USER_KEY);
    }

    fn set_locale(&mut self, locale: Locale) {
        save_json(self.storage.as_ref(), LOCALE_KEY, &locale);
        self.session.set_locale(locale);
    }

    fn set_dark_mode(&mut self, dark_mode: bool) {
        save_json(self.storage.as_ref(), DARK_MODE_KEY, &dark_mode);
        self.session.set_dark_mode(dark_mode);
    }
}

/// Persisted flags may be booleans or 0/1
fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Ack, GatewayError, IdentityReply, MockBackend, Reply};
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn store_with(backend: MockBackend, storage: Arc<MemoryStore>) -> SessionStore {
        SessionStore::new(Arc::new(backend), storage)
    }

    fn ba_user() -> UserRecord {
        serde_json::from_value(json!({
            "id": 1,
            "username": "ba1",
            "name": "Budi",
            "permission": 5,
            "locale": "id",
            "dark_mode": false
        }))
        .unwrap()
    }

    fn login_reply() -> Reply<LoginReply> {
        Reply::ok(LoginReply {
            success: true,
            message: None,
            token: Some("abc".to_string()),
            user: Some(ba_user()),
        })
    }

    async fn logged_in(backend: MockBackend, storage: Arc<MemoryStore>) -> SessionStore {
        let mut backend = backend;
        backend.expect_login().returning(|_| Ok(login_reply()));
        let mut store = store_with(backend, storage);
        store
            .login(&Credentials::new("ba1", "Secret123"))
            .await
            .unwrap();
        store
    }

    #[test]
    fn test_cold_start_defaults() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = store_with(MockBackend::new(), storage);

        let session = store.restore();
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
        assert_eq!(session.locale(), Some(&Locale::new("en")));
        assert!(session.dark_mode());
    }

    #[test]
    fn test_restore_is_idempotent() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(USER_KEY, r#"{"loggedIn":true,"token":"abc","username":"ba1"}"#)
            .unwrap();
        storage.set(LOCALE_KEY, "\"id\"").unwrap();
        storage.set(DARK_MODE_KEY, "0").unwrap();

        let mut store = store_with(MockBackend::new(), storage);
        let first = store.restore().clone();
        let second = store.restore().clone();

        assert_eq!(first, second);
        assert_eq!(first.token(), Some("abc"));
        assert_eq!(first.locale(), Some(&Locale::new("id")));
        assert!(!first.dark_mode());
    }

    #[test]
    fn test_restore_tolerates_malformed_keys() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(USER_KEY, "{broken").unwrap();
        storage.set(LOCALE_KEY, "\"id\"").unwrap();
        storage.set(DARK_MODE_KEY, "\"maybe\"").unwrap();

        let mut store = store_with(MockBackend::new(), storage);
        let session = store.restore();

        assert!(!session.is_logged_in());
        assert_eq!(session.locale(), Some(&Locale::new("id")));
        assert!(session.dark_mode());
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields_without_network() {
        // No expectations: any backend call would panic
        let mut store = store_with(MockBackend::new(), Arc::new(MemoryStore::new()));

        for (username, password) in [("", "Secret123"), ("ba1", ""), ("", "")] {
            let err = store
                .login(&Credentials::new(username, password))
                .await
                .unwrap_err();
            assert!(matches!(err, PartnerError::Validation(_)));
        }
        assert!(!store.session().is_logged_in());
    }

    #[tokio::test]
    async fn test_login_success_persists_everything() {
        let storage = Arc::new(MemoryStore::new());
        let mut backend = MockBackend::new();
        backend
            .expect_login()
            .withf(|c| c.username == "ba1" && c.password == "Secret123")
            .times(1)
            .returning(|_| Ok(login_reply()));
        let mut store = store_with(backend, Arc::clone(&storage));

        let session = store
            .login(&Credentials::new("ba1", "Secret123"))
            .await
            .unwrap();

        assert!(session.is_logged_in());
        assert_eq!(session.token(), Some("abc"));
        assert_eq!(session.locale(), Some(&Locale::new("id")));
        assert!(!session.dark_mode());
        assert!(session.is_brand_ambassador());

        let user: Value = serde_json::from_str(&storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(user["token"], json!("abc"));
        assert_eq!(user["loggedIn"], json!(true));
        assert_eq!(storage.get(LOCALE_KEY).unwrap().as_deref(), Some("\"id\""));
        assert_eq!(storage.get(DARK_MODE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_login_unauthorized() {
        let mut backend = MockBackend::new();
        backend.expect_login().returning(|_| {
            Err(GatewayError::Status {
                status: 401,
                message: Some("Unauthorized".to_string()),
            })
        });
        let mut store = store_with(backend, Arc::new(MemoryStore::new()));

        let err = store
            .login(&Credentials::new("ba1", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Username or Password is Invalid");
        assert!(!store.session().is_logged_in());
    }

    #[tokio::test]
    async fn test_login_generic_failures() {
        let failures: Vec<Result<Reply<LoginReply>, GatewayError>> = vec![
            Err(GatewayError::Transport("connection refused".to_string())),
            Err(GatewayError::Status {
                status: 500,
                message: None,
            }),
            Ok(Reply::ok(LoginReply::default())),
            Ok(Reply::ok(LoginReply {
                success: true,
                token: Some("abc".to_string()),
                ..LoginReply::default()
            })),
        ];

        for failure in failures {
            let mut backend = MockBackend::new();
            backend
                .expect_login()
                .return_once(move |_| failure);
            let mut store = store_with(backend, Arc::new(MemoryStore::new()));

            let err = store
                .login(&Credentials::new("ba1", "Secret123"))
                .await
                .unwrap_err();
            assert_eq!(err, PartnerError::Internal);
            assert_eq!(store.session().token(), None);
        }
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let storage = Arc::new(MemoryStore::new());
        let mut backend = MockBackend::new();
        backend
            .expect_logout()
            .withf(|token| token == "abc")
            .times(1)
            .returning(|_| Err(GatewayError::Transport("offline".to_string())));
        let mut store = logged_in(backend, Arc::clone(&storage)).await;

        assert_eq!(storage.len(), 3);

        let handle = store.logout().expect("notification spawned");
        assert!(!store.session().is_logged_in());
        assert_eq!(store.session().token(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        // Locale and theme outlive the session
        assert_eq!(storage.len(), 2);

        handle.await.unwrap();
        assert!(!store.session().is_logged_in());
    }

    #[tokio::test]
    async fn test_logout_when_logged_out_sends_nothing() {
        let mut store = store_with(MockBackend::new(), Arc::new(MemoryStore::new()));
        assert!(store.logout().is_none());
    }

    #[tokio::test]
    async fn test_refresh_keeps_token() {
        let storage = Arc::new(MemoryStore::new());
        let mut backend = MockBackend::new();
        backend
            .expect_fetch_user()
            .withf(|token| token == "abc")
            .returning(|_| {
                let mut user = ba_user();
                user.name = Some("Budi Santoso".to_string());
                user.dark_mode = Some(true);
                Ok(Reply::ok(IdentityReply {
                    success: true,
                    message: None,
                    user,
                }))
            });
        let mut store = logged_in(backend, Arc::clone(&storage)).await;

        let session = store.refresh_identity().await.unwrap();
        assert_eq!(session.token(), Some("abc"));
        assert_eq!(
            session.profile().and_then(|p| p.name.as_deref()),
            Some("Budi Santoso")
        );
        assert!(session.dark_mode());
        assert_eq!(storage.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(store.last_error(), None);
    }

    #[tokio::test]
    async fn test_refresh_failure_resets_and_records_message() {
        let storage = Arc::new(MemoryStore::new());
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|_| {
            Ok(Reply::ok(IdentityReply {
                success: false,
                message: Some("Account suspended".to_string()),
                user: UserRecord::default(),
            }))
        });
        let mut store = logged_in(backend, Arc::clone(&storage)).await;

        let err = store.refresh_identity().await.unwrap_err();
        assert_eq!(err, PartnerError::Server("Account suspended".to_string()));
        assert!(!store.session().is_logged_in());
        assert_eq!(store.last_error(), Some("Account suspended"));
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_refresh_network_failure() {
        let mut backend = MockBackend::new();
        backend
            .expect_fetch_user()
            .returning(|_| Err(GatewayError::Transport("timeout".to_string())));
        let mut store = logged_in(backend, Arc::new(MemoryStore::new())).await;

        assert_eq!(
            store.refresh_identity().await.unwrap_err(),
            PartnerError::Internal
        );
        assert_eq!(store.last_error(), Some("Internal Server Error"));
    }

    #[tokio::test]
    async fn test_change_locale_logged_out_is_local() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = store_with(MockBackend::new(), Arc::clone(&storage));

        let locale = store.change_locale("id").await.unwrap();
        assert_eq!(locale, Locale::new("id"));
        assert_eq!(storage.get(LOCALE_KEY).unwrap().as_deref(), Some("\"id\""));

        assert_eq!(
            store.change_locale("indonesian").await.unwrap_err(),
            PartnerError::Validation(ValidationError::InvalidLocale)
        );
    }

    #[tokio::test]
    async fn test_change_theme_rejected_keeps_state() {
        let storage = Arc::new(MemoryStore::new());
        let mut backend = MockBackend::new();
        backend
            .expect_change_theme()
            .withf(|token, dark| token == "abc" && *dark)
            .returning(|_, _| Ok(Reply::ok(Ack::failure(Some("Theme unavailable")))));
        let mut store = logged_in(backend, Arc::clone(&storage)).await;

        let err = store.change_theme(true).await.unwrap_err();
        assert_eq!(err, PartnerError::Server("Theme unavailable".to_string()));
        assert!(!store.session().dark_mode());
        assert_eq!(storage.get(DARK_MODE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_change_locale_logged_in() {
        let storage = Arc::new(MemoryStore::new());
        let mut backend = MockBackend::new();
        backend
            .expect_change_locale()
            .withf(|token, locale| token == "abc" && locale.as_str() == "en")
            .returning(|_, _| Ok(Reply::ok(Ack::success())));
        let mut store = logged_in(backend, Arc::clone(&storage)).await;

        store.change_locale("en").await.unwrap();
        assert_eq!(store.session().locale(), Some(&Locale::new("en")));
        assert_eq!(storage.get(LOCALE_KEY).unwrap().as_deref(), Some("\"en\""));
    }

    #[tokio::test]
    async fn test_change_password_requires_login() {
        let store = store_with(MockBackend::new(), Arc::new(MemoryStore::new()));
        let change = PasswordChange {
            current: "Secret123".to_string(),
            password: "Newpass123".to_string(),
            password_confirmation: "Newpass123".to_string(),
        };

        assert_eq!(
            store.change_password(&change).await.unwrap_err(),
            PartnerError::NotLoggedIn
        );
    }

    #[tokio::test]
    async fn test_change_password_surfaces_server_message() {
        let mut backend = MockBackend::new();
        backend.expect_change_password().returning(|_, _| {
            Err(GatewayError::Status {
                status: 422,
                message: Some("Current password is incorrect".to_string()),
            })
        });
        let store = logged_in(backend, Arc::new(MemoryStore::new())).await;
        let change = PasswordChange {
            current: "Secret123".to_string(),
            password: "Newpass123".to_string(),
            password_confirmation: "Newpass123".to_string(),
        };

        assert_eq!(
            store.change_password(&change).await.unwrap_err(),
            PartnerError::Server("Current password is incorrect".to_string())
        );
    }
}
