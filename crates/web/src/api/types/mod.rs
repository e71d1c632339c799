//! JSON shapes exchanged with the QuitQ REST backend.
//!
//! Field names follow the backend's camelCase. Everything except the record
//! id is optional on decode because the backend omits fields freely.

pub mod account;
pub mod catalog;
pub mod commerce;
pub mod location;
pub mod upload;

pub use account::*;
pub use catalog::*;
pub use commerce::*;
pub use location::*;
pub use upload::*;

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default (used for lists).
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a value the backend sends either as a string or a number
/// (OTP codes, for instance) into a string.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Float(n)) => Some(n.to_string()),
        None => None,
    })
}
