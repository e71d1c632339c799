//! Users, addresses and the authentication payloads.

use quitq_core::{AddressId, CityId, UserId, UserRole, UserStatus};
use serde::{Deserialize, Serialize};

// =============================================================================
// Users
// =============================================================================

/// A registered account as listed by `GET /api/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub dob: Option<String>,
    pub contact_number: Option<String>,
    pub gender_id: Option<i32>,
    pub user_type_id: Option<i32>,
    pub user_status_id: Option<i32>,
}

impl User {
    /// First and last name joined, skipping missing parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Role label, or `Unknown` for codes this client does not know.
    #[must_use]
    pub fn role_label(&self) -> &'static str {
        self.user_type_id
            .and_then(|code| UserRole::try_from(code).ok())
            .map_or("Unknown", UserRole::label)
    }

    /// Status label, or `Unknown` for codes this client does not know.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        self.user_status_id
            .and_then(|code| UserStatus::try_from(code).ok())
            .map_or("Unknown", UserStatus::label)
    }
}

// =============================================================================
// Addresses
// =============================================================================

/// A delivery address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub user_address_id: AddressId,
    pub user_id: Option<UserId>,
    pub door_number: Option<String>,
    pub apartment_name: Option<String>,
    pub landmark: Option<String>,
    pub street: Option<String>,
    pub city_id: Option<CityId>,
    pub postal_code: Option<String>,
    pub contact_number: Option<String>,
    pub status_id: Option<i32>,
}

/// Body of `POST /api/user-addresses` and `PUT /api/user-addresses/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub user_id: UserId,
    pub door_number: String,
    pub apartment_name: String,
    pub landmark: String,
    pub street: String,
    pub city_id: CityId,
    pub postal_code: String,
    pub contact_number: String,
    /// Always `1` (active) for addresses saved from the account page.
    pub status_id: i32,
}

// =============================================================================
// Authentication
// =============================================================================

/// Body of `POST /api/token/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Role as the login endpoint reports it: a name or a `userTypeId` code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoleField {
    Code(i32),
    Name(String),
}

/// Response of `POST /api/token/login`.
///
/// A response without a token means the credentials were rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: Option<String>,
    pub username: Option<String>,
    #[serde(alias = "id")]
    pub user_id: Option<UserId>,
    #[serde(alias = "userType")]
    pub role: Option<RoleField>,
    pub user_type_id: Option<i32>,
}

impl LoginResponse {
    /// The non-empty token, if the login succeeded.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// The account role. Falls back to `Customer` when the response does
    /// not say.
    #[must_use]
    pub fn role(&self) -> UserRole {
        let from_field = match &self.role {
            Some(RoleField::Name(name)) => UserRole::from_name(name),
            Some(RoleField::Code(code)) => UserRole::try_from(*code).ok(),
            None => None,
        };
        from_field
            .or_else(|| self.user_type_id.and_then(|code| UserRole::try_from(code).ok()))
            .unwrap_or_default()
    }
}

/// Body of `POST /api/users/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `yyyy-mm-ddT00:00:00`.
    pub dob: String,
    pub contact_number: String,
    pub gender_id: i32,
    pub user_status_id: i32,
    pub user_type_id: i32,
}

/// `{success, message}` envelope used by registration and password reset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

/// Body of `PUT /api/account/reset-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_role_by_name() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token":"abc","username":"sam","userId":4,"role":"Seller"}"#,
        )
        .unwrap();
        assert_eq!(response.token(), Some("abc"));
        assert_eq!(response.user_id, Some(UserId::new(4)));
        assert_eq!(response.role(), UserRole::Seller);
    }

    #[test]
    fn test_login_response_role_by_code() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token":"abc","userTypeId":1}"#).unwrap();
        assert_eq!(response.role(), UserRole::Admin);

        let response: LoginResponse = serde_json::from_str(r#"{"token":"abc","role":2}"#).unwrap();
        assert_eq!(response.role(), UserRole::Seller);
    }

    #[test]
    fn test_login_response_without_token() {
        let response: LoginResponse = serde_json::from_str(r#"{"token":""}"#).unwrap();
        assert_eq!(response.token(), None);
        assert_eq!(response.role(), UserRole::Customer);
    }

    #[test]
    fn test_register_request_shape() {
        let request = RegisterRequest {
            username: "sam".to_string(),
            password: "hunter22".to_string(),
            email: "sam@quitq.in".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Lee".to_string(),
            dob: "1990-04-01T00:00:00".to_string(),
            contact_number: "9876543210".to_string(),
            gender_id: 1,
            user_status_id: 1,
            user_type_id: 3,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["firstName"], "Sam");
        assert_eq!(json["contactNumber"], "9876543210");
        assert_eq!(json["userTypeId"], 3);
        assert_eq!(json["dob"], "1990-04-01T00:00:00");
    }

    #[test]
    fn test_user_labels() {
        let user: User = serde_json::from_str(
            r#"{"userId":9,"firstName":"Ada","lastName":"","userTypeId":2,"userStatusId":7}"#,
        )
        .unwrap();
        assert_eq!(user.full_name(), "Ada");
        assert_eq!(user.role_label(), "Seller");
        assert_eq!(user.status_label(), "Unknown");
    }
}
