//! Authentication API wrappers.

use std::future::Future;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use avento_core::{AuthSession, User};

use super::{ok_or_api_error, ApiClient, ApiError};
use crate::store::KeyValueStore;

const LOGIN_ERROR: &str = "Unable to login. Please check your credentials.";
const REGISTER_ERROR: &str = "Unable to register. Please check your input.";
const DELETE_ACCOUNT_ERROR: &str = "Unable to delete account.";

/// Authentication operations, as consumed by the auth state container.
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a session.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthSession, ApiError>> + Send;

    /// Create an account, then log in with the same credentials.
    fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> impl Future<Output = Result<AuthSession, ApiError>> + Send;

    /// Permanently delete the authenticated account.
    fn delete_account(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Debug, Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterPayload<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

/// Session shape returned by login.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: Option<String>,
    user: User,
}

impl From<SessionResponse> for AuthSession {
    fn from(response: SessionResponse) -> Self {
        Self::new(response.user, response.access_token)
    }
}

impl<S: KeyValueStore> AuthApi for ApiClient<S> {
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let url = self.url("/auth/login")?;
        let response = self
            .request(Method::POST, url)
            .json(&LoginPayload { email, password })
            .send()
            .await?;

        let session: SessionResponse = ok_or_api_error(response, LOGIN_ERROR)
            .await?
            .json()
            .await?;
        Ok(session.into())
    }

    #[instrument(skip(self, password))]
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthSession, ApiError> {
        let url = self.url("/auth/register")?;
        let response = self
            .request(Method::POST, url)
            .json(&RegisterPayload {
                email,
                password,
                name,
            })
            .send()
            .await?;

        ok_or_api_error(response, REGISTER_ERROR).await?;

        // Registration does not hand back a session; log in with the same
        // credentials to obtain one.
        self.login(email, password).await
    }

    #[instrument(skip(self))]
    async fn delete_account(&self) -> Result<(), ApiError> {
        let url = self.url("/auth/deleteAccount")?;
        let response = self.authed(Method::DELETE, url).send().await?;
        ok_or_api_error(response, DELETE_ACCOUNT_ERROR).await?;
        Ok(())
    }
}
