//! Admin pages: counts, every catalog list, stores, locations, orders and
//! shipment control.
//!
//! Pages that show two lists (categories with subcategories, states with
//! cities) fetch both at once and keep whichever half succeeded.

pub mod catalog;
pub mod dashboard;
pub mod locations;
pub mod orders;
pub mod shippers;
pub mod stores;
pub mod users;

use std::collections::HashMap;
use std::hash::Hash;

use axum::response::Redirect;

use crate::api::ApiError;
use crate::error::AppError;
use crate::routes::{Flash, finish_write, load_failure};

/// Landing page of the admin tree.
pub const ADMIN_HOME: &str = "/admin";

/// Fallback for a row whose parent is missing from its list.
const UNKNOWN: &str = "Unknown";

/// `id | name` table row with a delete button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRow {
    pub id: String,
    pub name: String,
}

impl NamedRow {
    pub fn new(id: impl ToString, name: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.unwrap_or_default().to_string(),
        }
    }
}

/// Table row that also names its parent (category or state).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRow {
    pub id: String,
    pub name: String,
    pub parent: String,
}

/// Id to display name, for resolving a child's parent.
pub fn name_index<K, T>(
    items: &[T],
    key: impl Fn(&T) -> K,
    name: impl Fn(&T) -> Option<&str>,
) -> HashMap<K, String>
where
    K: Eq + Hash,
{
    items
        .iter()
        .filter_map(|item| name(item).map(|n| (key(item), n.to_string())))
        .collect()
}

/// Parent name for `id`, or "Unknown".
#[must_use]
pub fn parent_name<K: Eq + Hash>(names: &HashMap<K, String>, id: Option<K>) -> String {
    id.and_then(|id| names.get(&id))
        .cloned()
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Take a list for an admin table. A failure leaves the table empty and sets
/// the page error, unless the token was rejected.
///
/// # Errors
///
/// Returns `AppError::Api` when the backend answered 401.
pub fn list_or_flash<T>(
    result: Result<Vec<T>, ApiError>,
    flash: &mut Flash,
    message: &str,
) -> Result<Vec<T>, AppError> {
    match result {
        Ok(items) => Ok(items),
        Err(e) => {
            let failed = load_failure(e, message)?;
            *flash = std::mem::take(flash).or_error(failed.error);
            Ok(Vec::new())
        }
    }
}

/// Redirect after deleting a `noun` ("user", "brand", ...).
pub fn finish_delete(result: Result<(), ApiError>, back: &str, noun: &str) -> Redirect {
    let success = format!("{} deleted successfully!", capitalize(noun));
    finish_write(result, back, Some(&success), &format!("Failed to delete {noun}."))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
