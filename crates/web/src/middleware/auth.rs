//! Authentication middleware and extractors.
//!
//! Provides extractors that require a signed-in user, optionally of a given
//! role, in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use quitq_core::UserRole;
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Error returned when a page needs a user the session does not hold.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// Redirect to login page (for page requests).
    RedirectToLogin,
    /// Signed in with another role; send the user to their own home.
    WrongRole(&'static str),
    /// Unauthorized response (for HTMX fragment requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::WrongRole(home) => Redirect::to(home).into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                AppendHeaders([("HX-Redirect", "/login")]),
            )
                .into_response(),
        }
    }
}

/// Read the session user, rejecting anonymous requests.
async fn current_user(parts: &Parts) -> Result<CurrentUser, AuthRejection> {
    // Get the session from extensions (set by SessionManagerLayer)
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::Unauthorized)?;

    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
        .ok_or_else(|| {
            if parts.headers.contains_key("hx-request") {
                AuthRejection::Unauthorized
            } else {
                AuthRejection::RedirectToLogin
            }
        })
}

/// Defines an extractor that admits only users of one role.
macro_rules! role_extractor {
    ($(#[$meta:meta])* $name:ident, $role:expr) => {
        $(#[$meta])*
        pub struct $name(pub CurrentUser);

        impl<S> FromRequestParts<S> for $name
        where
            S: Send + Sync,
        {
            type Rejection = AuthRejection;

            async fn from_request_parts(
                parts: &mut Parts,
                _state: &S,
            ) -> Result<Self, Self::Rejection> {
                let user = current_user(parts).await?;
                check_role(&user, $role)?;
                Ok(Self(user))
            }
        }
    };
}

role_extractor!(
    /// Extractor for the admin page tree.
    RequireAdmin,
    UserRole::Admin
);
role_extractor!(
    /// Extractor for the seller page tree.
    RequireSeller,
    UserRole::Seller
);
role_extractor!(
    /// Extractor for the customer page tree.
    RequireCustomer,
    UserRole::Customer
);

/// Reject a user whose role does not match the page tree.
fn check_role(user: &CurrentUser, required: UserRole) -> Result<(), AuthRejection> {
    if user.role == required {
        Ok(())
    } else {
        Err(AuthRejection::WrongRole(user.home()))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike the role extractors, this does not reject the request if nobody is logged in.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(user): OptionalAuth,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.username),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session.
///
/// The session id is cycled first so that a pre-login cookie cannot be
/// reused after sign-in.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            user_id: None,
            username: "sam".to_string(),
            role,
            token: "jwt".to_string(),
        }
    }

    #[test]
    fn test_check_role_sends_to_own_home() {
        assert_eq!(check_role(&user(UserRole::Admin), UserRole::Admin), Ok(()));
        assert_eq!(
            check_role(&user(UserRole::Customer), UserRole::Admin),
            Err(AuthRejection::WrongRole("/customer"))
        );
        assert_eq!(
            check_role(&user(UserRole::Seller), UserRole::Customer),
            Err(AuthRejection::WrongRole("/seller-dashboard"))
        );
    }

    #[test]
    fn test_rejection_responses() {
        let response = AuthRejection::RedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");

        let response = AuthRejection::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["hx-redirect"], "/login");
    }
}
