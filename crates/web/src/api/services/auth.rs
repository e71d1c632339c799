//! Login, registration and password reset.

use tracing::instrument;

use crate::api::types::{
    ActionResponse, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
};
use crate::api::{ApiClient, ApiError};

/// Unauthenticated account endpoints.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: Option<LoginResponse> =
            self.client.post_json("api/token/login", &request).await?;
        Ok(response.unwrap_or_default())
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<ActionResponse, ApiError> {
        let response: Option<ActionResponse> =
            self.client.post_json("api/users/register", request).await?;
        Ok(response.unwrap_or_default())
    }

    /// Set a new password for the account registered under `email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<ActionResponse, ApiError> {
        let response: Option<ActionResponse> = self
            .client
            .put_json("api/account/reset-password", request)
            .await?;
        Ok(response.unwrap_or_default())
    }
}
