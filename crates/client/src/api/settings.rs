//! User settings API wrappers.

use std::future::Future;

use reqwest::Method;
use tracing::instrument;

use avento_core::UserSettings;

use super::{ok_or_api_error, ApiClient, ApiError};
use crate::store::KeyValueStore;

const FETCH_SETTINGS_ERROR: &str = "Unable to load settings.";
const UPDATE_SETTINGS_ERROR: &str = "Unable to update settings.";

/// Settings operations, as consumed by the settings state container.
pub trait SettingsApi: Send + Sync {
    /// Fetch the authenticated user's settings record.
    fn fetch_settings(&self) -> impl Future<Output = Result<UserSettings, ApiError>> + Send;

    /// Replace the authenticated user's settings record.
    fn update_settings(
        &self,
        settings: &UserSettings,
    ) -> impl Future<Output = Result<UserSettings, ApiError>> + Send;
}

impl<S: KeyValueStore> SettingsApi for ApiClient<S> {
    #[instrument(skip(self))]
    async fn fetch_settings(&self) -> Result<UserSettings, ApiError> {
        let url = self.url("/settings")?;
        let response = self.authed(Method::GET, url).send().await?;
        let settings = ok_or_api_error(response, FETCH_SETTINGS_ERROR)
            .await?
            .json()
            .await?;
        Ok(settings)
    }

    #[instrument(skip(self, settings))]
    async fn update_settings(&self, settings: &UserSettings) -> Result<UserSettings, ApiError> {
        let url = self.url("/settings")?;
        let response = self
            .authed(Method::PUT, url)
            .json(settings)
            .send()
            .await?;
        let settings = ok_or_api_error(response, UPDATE_SETTINGS_ERROR)
            .await?
            .json()
            .await?;
        Ok(settings)
    }
}
