//! Roles and status enums.
//!
//! The backend encodes user roles, user statuses and genders as small
//! integers and order statuses as free-form strings. These enums give the
//! client a closed view of the values it knows how to route and label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when an integer code has no known meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code: {code}")]
pub struct UnknownCode {
    /// The enumeration being decoded.
    pub kind: &'static str,
    /// The offending value.
    pub code: i32,
}

/// Implements integer (de)serialization for a code-backed enum.
macro_rules! int_coded {
    ($name:ident, $kind:literal, { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Backend integer code.
            #[must_use]
            pub const fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            /// Human readable label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = UnknownCode;

            fn try_from(code: i32) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(UnknownCode { kind: $kind, code }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i32(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = i32::deserialize(deserializer)?;
                Self::try_from(code).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Account role (`userTypeId`). Decides which page tree a user lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    Admin,
    Seller,
    #[default]
    Customer,
}

int_coded!(UserRole, "user role", {
    Admin = 1 => "Admin",
    Seller = 2 => "Seller",
    Customer = 3 => "Customer",
});

impl UserRole {
    /// Parse a role name as returned by some login responses (`"Admin"`,
    /// `"seller"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "seller" => Some(Self::Seller),
            "customer" | "user" => Some(Self::Customer),
            _ => None,
        }
    }
}

/// Account status (`userStatusId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Banned,
}

int_coded!(UserStatus, "user status", {
    Active = 1 => "Active",
    Inactive = 2 => "Inactive",
    Banned = 3 => "Banned",
});

/// Gender (`genderId`) as offered on the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenderKind {
    #[default]
    Male,
    Female,
    Other,
}

int_coded!(GenderKind, "gender", {
    Male = 1 => "Male",
    Female = 2 => "Female",
    Other = 3 => "Other",
});

/// Order status string.
///
/// Unknown values are kept verbatim in [`OrderStatus::Other`] so that a new
/// backend status is displayed rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Returned,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    /// Statuses an admin may set on a shipment, in display order.
    pub const ADMIN_CHOICES: &'static [Self] = &[
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Returned,
        Self::Cancelled,
    ];

    /// Statuses a seller may set on an order, in display order.
    pub const SELLER_CHOICES: &'static [Self] = &[
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The wire string for this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Returned => "Returned",
            Self::Cancelled => "Cancelled",
            Self::Other(s) => s,
        }
    }

    /// Whether the status closes out delivery (the shipment reached or came
    /// back from the customer).
    #[must_use]
    pub const fn is_delivery_outcome(&self) -> bool {
        matches!(self, Self::Delivered | Self::Returned)
    }

    /// CSS class used for status badges.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Pending => "status-pending",
            Self::Processing => "status-processing",
            Self::Shipped => "status-shipped",
            Self::Delivered => "status-delivered",
            Self::Returned => "status-returned",
            Self::Cancelled => "status-cancelled",
            Self::Other(_) => "status-unknown",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Pending" => Self::Pending,
            "Processing" => Self::Processing,
            "Shipped" => Self::Shipped,
            "Delivered" => Self::Delivered,
            "Returned" => Self::Returned,
            "Cancelled" => Self::Cancelled,
            other => Self::Other(other.to_owned()),
        })
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let Ok(status) = s.parse::<Self>();
        Ok(status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_codes() {
        assert_eq!(UserRole::try_from(1).unwrap(), UserRole::Admin);
        assert_eq!(UserRole::try_from(2).unwrap(), UserRole::Seller);
        assert_eq!(UserRole::try_from(3).unwrap(), UserRole::Customer);
        assert_eq!(
            UserRole::try_from(9),
            Err(UnknownCode {
                kind: "user role",
                code: 9
            })
        );
    }

    #[test]
    fn test_user_role_json_is_integer() {
        assert_eq!(serde_json::to_string(&UserRole::Seller).unwrap(), "2");
        let role: UserRole = serde_json::from_str("1").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert!(serde_json::from_str::<UserRole>("0").is_err());
    }

    #[test]
    fn test_user_role_from_name() {
        assert_eq!(UserRole::from_name("Admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_name(" seller "), Some(UserRole::Seller));
        assert_eq!(UserRole::from_name("CUSTOMER"), Some(UserRole::Customer));
        assert_eq!(UserRole::from_name("shipper"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(UserStatus::Banned.to_string(), "Banned");
        assert_eq!(GenderKind::Other.label(), "Other");
        assert_eq!(GenderKind::ALL.len(), 3);
    }

    #[test]
    fn test_order_status_preserves_unknown_values() {
        let status: OrderStatus = serde_json::from_str("\"OnHold\"").unwrap();
        assert_eq!(status, OrderStatus::Other("OnHold".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"OnHold\"");
        assert_eq!(status.badge_class(), "status-unknown");
    }

    #[test]
    fn test_order_status_delivery_outcome() {
        assert!(OrderStatus::Delivered.is_delivery_outcome());
        assert!(OrderStatus::Returned.is_delivery_outcome());
        assert!(!OrderStatus::Shipped.is_delivery_outcome());
        assert!(!OrderStatus::Cancelled.is_delivery_outcome());
    }
}
