//! Settings state container.
//!
//! Changes apply optimistically: memory and the local cache update
//! immediately, then the record is written to the backend. A backend
//! failure records an error but does not roll the optimistic value back;
//! the next `load_settings` reconciles against the server.
//!
//! The `darkMode` preference additionally drives the injected theme sink.
//! It is tri-state: forced on, forced off, or deferred to the OS preference,
//! which is queried at apply time so it is never stale.

use std::sync::{Mutex, PoisonError};

use tracing::instrument;

use avento_core::{AuthSession, Setting, UserSettings};

use crate::api::{ApiError, SettingsApi};
use crate::error::ClientError;
use crate::state::ThemeSink;
use crate::store::{KeyValueStore, AUTH_KEY, SETTINGS_KEY};

#[derive(Default)]
struct SettingsState {
    settings: UserSettings,
    loading: bool,
    last_error: Option<String>,
}

/// Per-user settings container.
pub struct Settings<S, A, T>
where
    S: KeyValueStore,
    A: SettingsApi,
    T: ThemeSink,
{
    store: S,
    api: A,
    theme: T,
    state: Mutex<SettingsState>,
}

impl<S, A, T> Settings<S, A, T>
where
    S: KeyValueStore,
    A: SettingsApi,
    T: ThemeSink,
{
    /// Create a container hydrated from the local cache, defaulted when absent.
    pub fn new(store: S, api: A, theme: T) -> Self {
        let settings = store.load(SETTINGS_KEY).unwrap_or_default();
        Self {
            store,
            api,
            theme,
            state: Mutex::new(SettingsState {
                settings,
                ..SettingsState::default()
            }),
        }
    }

    /// Current settings record.
    #[must_use]
    pub fn settings(&self) -> UserSettings {
        self.lock_state().settings.clone()
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

    /// Pull the authoritative record from the backend.
    ///
    /// A no-op when unauthenticated. A 404 (no record yet) keeps the
    /// defaults without recording an error.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on any other backend failure.
    #[instrument(skip(self))]
    pub async fn load_settings(&self) -> Result<(), ClientError> {
        if !self.is_authenticated() {
            return Ok(());
        }

        self.begin();
        match self.api.fetch_settings().await {
            Ok(remote) => {
                self.adopt(remote.clone())?;
                self.apply_theme(remote.dark_mode);
                Ok(())
            }
            // No record server-side yet: defaults stand.
            Err(ApiError::Api { status: 404, .. }) => {
                self.lock_state().loading = false;
                Ok(())
            }
            Err(error) => Err(self.fail(error.into())),
        }
    }

    /// Apply a single preference change.
    ///
    /// The change lands in memory, the local cache, and (for `darkMode`) the
    /// theme sink before the backend write starts. A no-op when
    /// unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when persisting or the backend write fails;
    /// the optimistic value stays either way.
    #[instrument(skip(self))]
    pub async fn update_setting(&self, setting: Setting) -> Result<(), ClientError> {
        if !self.is_authenticated() {
            return Ok(());
        }

        let updated = {
            let mut state = self.lock_state();
            state.settings.apply(setting);
            state.settings.clone()
        };
        let persisted = self.store.save(SETTINGS_KEY, &updated);

        if let Setting::DarkMode(preference) = setting {
            self.apply_theme(preference);
        }

        persisted.map_err(|error| self.fail(error.into()))?;

        match self.api.update_settings(&updated).await {
            Ok(_) => Ok(()),
            Err(error) => Err(self.fail(error.into())),
        }
    }

    fn is_authenticated(&self) -> bool {
        self.store.load::<AuthSession>(AUTH_KEY).is_some()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SettingsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        let mut state = self.lock_state();
        state.loading = true;
        state.last_error = None;
    }

    fn adopt(&self, settings: UserSettings) -> Result<(), ClientError> {
        let saved = self.store.save(SETTINGS_KEY, &settings);
        {
            let mut state = self.lock_state();
            state.settings = settings;
            state.loading = false;
        }
        saved.map_err(|error| self.fail(error.into()))
    }

    /// Resolve the tri-state preference and drive the theme sink.
    fn apply_theme(&self, preference: Option<bool>) {
        let dark = preference.unwrap_or_else(|| self.theme.system_prefers_dark());
        self.theme.apply(dark);
    }

    fn fail(&self, error: ClientError) -> ClientError {
        let mut state = self.lock_state();
        state.loading = false;
        state.last_error = Some(error.to_string());
        error
    }
}
