//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use quitq_core::{UserId, UserRole};

use crate::api::types::LoginResponse;
use crate::api::{AdminService, ApiClient, CustomerService, SellerService, StoreService};
use crate::state::AppState;

/// Session-stored user identity.
///
/// Holds the backend token so that every REST call made on the user's
/// behalf carries it. The token never reaches the browser.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user id, when the login response included one.
    pub user_id: Option<UserId>,
    /// Name shown in the page header.
    pub username: String,
    /// Role deciding which page tree the user may open.
    pub role: UserRole,
    /// Bearer token for the REST backend.
    pub token: String,
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CurrentUser {
    /// Build the session user from a login response.
    ///
    /// Returns `None` when the backend sent no token.
    #[must_use]
    pub fn from_login(response: &LoginResponse, entered_username: &str) -> Option<Self> {
        let token = response.token()?;
        Some(Self {
            user_id: response.user_id,
            username: response
                .username
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| entered_username.to_string()),
            role: response.role(),
            token: token.to_string(),
        })
    }

    /// Landing page of this user's role.
    #[must_use]
    pub const fn home(&self) -> &'static str {
        role_home(self.role)
    }

    /// REST client carrying this user's token.
    #[must_use]
    pub fn client(&self, state: &AppState) -> ApiClient {
        state.api().authorized(&self.token)
    }

    #[must_use]
    pub fn customer(&self, state: &AppState) -> CustomerService {
        CustomerService::new(self.client(state))
    }

    #[must_use]
    pub fn seller(&self, state: &AppState) -> SellerService {
        SellerService::new(self.client(state))
    }

    #[must_use]
    pub fn admin(&self, state: &AppState) -> AdminService {
        AdminService::new(self.client(state))
    }

    #[must_use]
    pub fn stores(&self, state: &AppState) -> StoreService {
        StoreService::new(self.client(state))
    }
}

/// Landing page for a role.
#[must_use]
pub const fn role_home(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "/admin",
        UserRole::Seller => "/seller-dashboard",
        UserRole::Customer => "/customer",
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
