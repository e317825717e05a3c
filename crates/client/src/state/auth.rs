//! Auth state container.
//!
//! Login and registration persist the resulting session so it survives
//! restarts; any failure clears both the in-memory and persisted session
//! before surfacing the backend's message verbatim. Logout is a purely
//! local operation.

use std::sync::{Mutex, PoisonError};

use tracing::instrument;

use avento_core::{AuthSession, Email, User};

use crate::api::AuthApi;
use crate::error::ClientError;
use crate::state::ConfirmPrompt;
use crate::store::{KeyValueStore, AUTH_KEY};
use crate::toast::{ToastRequest, Toasts};

const LOGOUT_CONFIRMATION: &str = "Are you sure you want to sign out of this account?";
const DELETE_ACCOUNT_CONFIRMATION: &str = "Are you sure you want to delete your account? This action cannot be undone and will permanently remove all account data.";

#[derive(Default)]
struct AuthState {
    session: Option<AuthSession>,
    loading: bool,
    last_error: Option<String>,
}

/// Authentication state container.
pub struct Auth<S, A, C>
where
    S: KeyValueStore,
    A: AuthApi,
    C: ConfirmPrompt,
{
    store: S,
    api: A,
    confirm: C,
    toasts: Toasts,
    state: Mutex<AuthState>,
}

impl<S, A, C> Auth<S, A, C>
where
    S: KeyValueStore,
    A: AuthApi,
    C: ConfirmPrompt,
{
    /// Create a container hydrated from the persisted session, if any.
    pub fn new(store: S, api: A, confirm: C, toasts: Toasts) -> Self {
        let session = store.load(AUTH_KEY);
        Self {
            store,
            api,
            confirm,
            toasts,
            state: Mutex::new(AuthState {
                session,
                ..AuthState::default()
            }),
        }
    }

    /// The current session, if authenticated.
    #[must_use]
    pub fn session(&self) -> Option<AuthSession> {
        self.lock_state().session.clone()
    }

    /// The signed-in user, if authenticated.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.lock_state()
            .session
            .as_ref()
            .map(|session| session.user.clone())
    }

    /// Whether a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock_state().session.is_some()
    }

    /// Whether a backend call is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.lock_state().loading
    }

    /// The message of the most recent failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.lock_state().last_error.clone()
    }

    /// Forget the recorded failure.
    pub fn clear_error(&self) {
        self.lock_state().last_error = None;
    }

    /// Create an account and sign in with it.
    ///
    /// The email is validated locally before any network traffic. On failure
    /// any persisted session is cleared and the backend's message surfaced.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on validation, network, or backend failure.
    #[instrument(skip(self, password, name))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, ClientError> {
        Email::parse(email).map_err(|error| self.drop_session_on(error.into(), "Registration error"))?;

        self.begin();
        match self.api.register(email, password, name).await {
            Ok(session) => {
                let user = session.user.clone();
                self.adopt_session(session)?;
                self.toasts.push(ToastRequest::new(
                    "Registration successful",
                    "Your account has been created.",
                ));
                Ok(user)
            }
            Err(error) => Err(self.drop_session_on(error.into(), "Registration error")),
        }
    }

    /// Sign in with credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network or backend failure; the persisted
    /// session is cleared first.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        self.begin();
        match self.api.login(email, password).await {
            Ok(session) => {
                let user = session.user.clone();
                self.adopt_session(session)?;
                self.toasts
                    .push(ToastRequest::new("Login successful", "You are now signed in."));
                Ok(user)
            }
            Err(error) => Err(self.drop_session_on(error.into(), "Login error")),
        }
    }

    /// Sign out locally, after confirmation.
    ///
    /// No backend call is made; the session simply stops existing on this
    /// device. Returns `Ok(false)` when the user declines.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] if clearing the persisted session fails.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<bool, ClientError> {
        if !self.confirm.confirm(LOGOUT_CONFIRMATION) {
            return Ok(false);
        }

        self.sign_out_local()?;
        self.toasts.push(ToastRequest::new(
            "Signed out",
            "You have been signed out of your account.",
        ));
        Ok(true)
    }

    /// Permanently delete the account, after confirmation.
    ///
    /// The local session is discarded regardless of the backend call's
    /// outcome; a backend failure is surfaced non-fatally after the local
    /// sign-out. Returns `Ok(false)` when the user declines.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the backend call or local cleanup fails.
    #[instrument(skip(self))]
    pub async fn delete_account(&self) -> Result<bool, ClientError> {
        if !self.confirm.confirm(DELETE_ACCOUNT_CONFIRMATION) {
            return Ok(false);
        }

        self.begin();
        let outcome = self.api.delete_account().await;

        // Locally signed out no matter what the backend said.
        self.sign_out_local()?;

        match outcome {
            Ok(()) => {
                self.toasts.push(ToastRequest::new(
                    "Account deleted",
                    "Your account has been permanently deleted.",
                ));
                Ok(true)
            }
            Err(error) => {
                let error = self.record(error.into());
                self.toasts.push(ToastRequest::destructive(
                    "Delete account error",
                    error.to_string(),
                ));
                Err(error)
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        let mut state = self.lock_state();
        state.loading = true;
        state.last_error = None;
    }

    /// Persist and adopt a fresh session.
    fn adopt_session(&self, session: AuthSession) -> Result<(), ClientError> {
        let saved = self.store.save(AUTH_KEY, &session);
        {
            let mut state = self.lock_state();
            state.session = Some(session);
            state.loading = false;
        }
        saved.map_err(|error| self.record(error.into()))
    }

    /// Clear the in-memory and persisted session.
    fn sign_out_local(&self) -> Result<(), ClientError> {
        {
            let mut state = self.lock_state();
            state.session = None;
            state.loading = false;
        }
        self.store
            .remove(AUTH_KEY)
            .map_err(|error| self.record(error.into()))
    }

    /// Record a failure, clearing any session, and toast it.
    fn drop_session_on(&self, error: ClientError, toast_title: &str) -> ClientError {
        {
            let mut state = self.lock_state();
            state.session = None;
            state.loading = false;
            state.last_error = Some(error.to_string());
        }
        if let Err(remove_error) = self.store.remove(AUTH_KEY) {
            tracing::warn!(%remove_error, "failed to clear persisted session");
        }
        self.toasts
            .push(ToastRequest::destructive(toast_title, error.to_string()));
        error
    }

    fn record(&self, error: ClientError) -> ClientError {
        let mut state = self.lock_state();
        state.loading = false;
        state.last_error = Some(error.to_string());
        error
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use avento_core::UserId;

    use crate::api::ApiError;
    use crate::store::MemoryStore;

    fn session(token: &str) -> AuthSession {
        AuthSession::new(
            User {
                id: UserId::new("u1"),
                name: "Ada".to_owned(),
                email: Email::parse("ada@example.com").unwrap(),
                role: None,
            },
            Some(token.to_owned()),
        )
    }

    struct StubAuthApi {
        response: Result<AuthSession, &'static str>,
        delete_calls: AtomicUsize,
    }

    impl StubAuthApi {
        fn ok(session: AuthSession) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(session),
                delete_calls: AtomicUsize::new(0),
            })
        }

        fn failing(message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                response: Err(message),
                delete_calls: AtomicUsize::new(0),
            })
        }

        fn respond(&self) -> Result<AuthSession, ApiError> {
            match &self.response {
                Ok(session) => Ok(session.clone()),
                Err(message) => Err(ApiError::Api {
                    status: 401,
                    message: (*message).to_string(),
                }),
            }
        }
    }

    impl AuthApi for Arc<StubAuthApi> {
        fn login(
            &self,
            _email: &str,
            _password: &str,
        ) -> impl Future<Output = Result<AuthSession, ApiError>> + Send {
            std::future::ready(self.respond())
        }

        fn register(
            &self,
            _email: &str,
            _password: &str,
            _name: &str,
        ) -> impl Future<Output = Result<AuthSession, ApiError>> + Send {
            std::future::ready(self.respond())
        }

        fn delete_account(&self) -> impl Future<Output = Result<(), ApiError>> + Send {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(self.respond().map(|_| ()))
        }
    }

    struct StubConfirm(bool);

    impl ConfirmPrompt for StubConfirm {
        fn confirm(&self, _message: &str) -> bool {
            self.0
        }
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let store = MemoryStore::new();
        let auth = Auth::new(
            store.clone(),
            StubAuthApi::ok(session("jwt")),
            StubConfirm(true),
            Toasts::new(),
        );

        let user = auth.login("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(user.name, "Ada");
        assert!(auth.is_authenticated());

        let persisted: AuthSession = store.load(AUTH_KEY).unwrap();
        assert_eq!(persisted.token.as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_login_failure_clears_persisted_session_and_surfaces_message() {
        let store = MemoryStore::new();
        store.save(AUTH_KEY, &session("stale")).unwrap();

        let auth = Auth::new(
            store.clone(),
            StubAuthApi::failing("invalid_credentials"),
            StubConfirm(true),
            Toasts::new(),
        );
        assert!(auth.is_authenticated()); // hydrated from stale session

        let error = auth.login("ada@example.com", "wrong").await.unwrap_err();
        assert_eq!(error.to_string(), "invalid_credentials");
        assert!(!auth.is_authenticated());
        assert!(store.load::<AuthSession>(AUTH_KEY).is_none());
        assert_eq!(auth.last_error().as_deref(), Some("invalid_credentials"));
    }

    #[tokio::test]
    async fn test_register_adopts_session() {
        let auth = Auth::new(
            MemoryStore::new(),
            StubAuthApi::ok(session("fresh")),
            StubConfirm(true),
            Toasts::new(),
        );

        auth.register("ada@example.com", "hunter22", "Ada")
            .await
            .unwrap();
        assert!(auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email_before_network() {
        let auth = Auth::new(
            MemoryStore::new(),
            StubAuthApi::ok(session("unused")),
            StubConfirm(true),
            Toasts::new(),
        );

        let error = auth.register("not-an-email", "hunter22", "Ada").await.unwrap_err();
        assert!(matches!(error, ClientError::Email(_)));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_requires_confirmation() {
        let store = MemoryStore::new();
        store.save(AUTH_KEY, &session("jwt")).unwrap();
        let auth = Auth::new(
            store.clone(),
            StubAuthApi::ok(session("jwt")),
            StubConfirm(false),
            Toasts::new(),
        );

        assert!(!auth.logout().unwrap());
        assert!(auth.is_authenticated());
        assert!(store.load::<AuthSession>(AUTH_KEY).is_some());
    }

    #[tokio::test]
    async fn test_logout_clears_session_locally() {
        let store = MemoryStore::new();
        store.save(AUTH_KEY, &session("jwt")).unwrap();
        let auth = Auth::new(
            store.clone(),
            StubAuthApi::ok(session("jwt")),
            StubConfirm(true),
            Toasts::new(),
        );

        assert!(auth.logout().unwrap());
        assert!(!auth.is_authenticated());
        assert!(store.load::<AuthSession>(AUTH_KEY).is_none());
    }

    #[tokio::test]
    async fn test_delete_account_signs_out_even_on_backend_failure() {
        let store = MemoryStore::new();
        store.save(AUTH_KEY, &session("jwt")).unwrap();
        let api = StubAuthApi::failing("server exploded");
        let auth = Auth::new(store.clone(), Arc::clone(&api), StubConfirm(true), Toasts::new());

        let error = auth.delete_account().await.unwrap_err();
        assert_eq!(error.to_string(), "server exploded");
        assert_eq!(api.delete_calls.load(Ordering::SeqCst), 1);
        // Signed out locally regardless
        assert!(!auth.is_authenticated());
        assert!(store.load::<AuthSession>(AUTH_KEY).is_none());
    }

    #[tokio::test]
    async fn test_delete_account_declined_is_a_noop() {
        let store = MemoryStore::new();
        store.save(AUTH_KEY, &session("jwt")).unwrap();
        let api = StubAuthApi::ok(session("jwt"));
        let auth = Auth::new(store, Arc::clone(&api), StubConfirm(false), Toasts::new());

        assert!(!auth.delete_account().await.unwrap());
        assert!(auth.is_authenticated());
        assert_eq!(api.delete_calls.load(Ordering::SeqCst), 0);
    }
}
