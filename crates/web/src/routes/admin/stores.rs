//! Store list and the create-store form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
};
use quitq_core::{CityId, StoreId, UserId, UserRole};
use tracing::instrument;

use crate::api::types::{City, StoreUpload, User};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::admin::{finish_delete, list_or_flash, name_index, parent_name};
use crate::routes::upload::UploadForm;
use crate::routes::{Flash, MessageQuery, OptionView, finish_write, or_empty, redirect_error};
use crate::state::AppState;

const STORES_PATH: &str = "/admin/stores";

/// Multipart field carrying the store logo.
pub const LOGO_FIELD: &str = "storeLogoFile";

/// Parse the create-store form.
///
/// # Errors
///
/// Returns the message to show when a field is missing or malformed.
pub fn store_upload(mut form: UploadForm) -> std::result::Result<StoreUpload, String> {
    Ok(StoreUpload {
        store_name: form.required("storeName", "Store name")?.to_string(),
        store_description: form.text("storeDescription").unwrap_or_default().to_string(),
        city_id: form.parsed::<CityId>("cityId", "City")?,
        user_id: form.parsed_opt::<UserId>("userId", "Owner")?,
        logo: form.file.take(),
    })
}

/// Row of the store table.
#[derive(Debug, Clone)]
pub struct StoreRowView {
    pub id: String,
    pub name: String,
    pub city: String,
}

/// Sellers who can own a store, as `<select>` options.
#[must_use]
pub fn owner_options(users: &[User]) -> Vec<OptionView> {
    users
        .iter()
        .filter(|u| u.user_type_id == Some(UserRole::Seller.code()))
        .map(|u| {
            let label = u.username.clone().unwrap_or_else(|| u.full_name());
            OptionView::new(u.user_id, format!("{label} (#{})", u.user_id), false)
        })
        .collect()
}

/// Stores page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/stores.html")]
pub struct StoresTemplate {
    pub username: String,
    pub flash: Flash,
    pub stores: Vec<StoreRowView>,
    pub cities: Vec<OptionView>,
    pub owners: Vec<OptionView>,
}

/// Stores with the create form. Cities and owners degrade to empty
/// dropdowns when their calls fail.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> Result<StoresTemplate> {
    let mut flash = Flash::from(messages);
    let stores_api = user.stores(&state);
    let admin = user.admin(&state);
    let (stores, cities, users) = tokio::join!(
        stores_api.get_stores(),
        stores_api.get_cities(),
        admin.get_users(),
    );

    let stores = list_or_flash(stores, &mut flash, "Failed to load stores.")?;
    let cities: Vec<City> = or_empty(cities, "cities");
    let users = or_empty(users, "users");
    let city_names = name_index(&cities, |c| c.city_id, |c| c.city_name.as_deref());

    Ok(StoresTemplate {
        username: user.username,
        flash,
        stores: stores
            .iter()
            .map(|s| StoreRowView {
                id: s.store_id.to_string(),
                name: s.store_name.clone().unwrap_or_default(),
                city: parent_name(&city_names, s.city_id),
            })
            .collect(),
        cities: cities
            .iter()
            .map(|c| OptionView::new(c.city_id, c.city_name.as_deref().unwrap_or_default(), false))
            .collect(),
        owners: owner_options(&users),
    })
}

/// Create a store from the multipart form.
#[instrument(skip(state, user, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    multipart: Multipart,
) -> Response {
    let upload = match UploadForm::read(multipart, LOGO_FIELD)
        .await
        .and_then(store_upload)
    {
        Ok(upload) => upload,
        Err(message) => return redirect_error(STORES_PATH, &message).into_response(),
    };

    let result = user.stores(&state).post_store(upload).await;
    finish_write(
        result,
        STORES_PATH,
        Some("Store created successfully!"),
        "Failed to create store.",
    )
    .into_response()
}

/// Delete a store.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<StoreId>,
) -> Response {
    let result = user.stores(&state).delete_store(id).await;
    finish_delete(result, STORES_PATH, "store").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_store_upload_requires_name_and_city() {
        let upload = store_upload(UploadForm::from_fields(&[
            ("storeName", "Corner Shop"),
            ("cityId", "3"),
            ("userId", ""),
        ]))
        .unwrap();
        assert_eq!(upload.city_id, CityId::new(3));
        assert_eq!(upload.user_id, None);
        assert_eq!(upload.store_description, "");

        assert_eq!(
            store_upload(UploadForm::from_fields(&[("cityId", "3")])).unwrap_err(),
            "Store name is required."
        );
        assert_eq!(
            store_upload(UploadForm::from_fields(&[("storeName", "A"), ("cityId", "x")]))
                .unwrap_err(),
            "City is not valid."
        );
    }

    #[test]
    fn test_owner_options_lists_sellers() {
        let users: Vec<User> = serde_json::from_str(&format!(
            r#"[
                {{"userId": 1, "username": "ravi", "userTypeId": {}}},
                {{"userId": 2, "username": "meena", "userTypeId": {}}}
            ]"#,
            UserRole::Seller.code(),
            UserRole::Customer.code()
        ))
        .unwrap();
        let options = owner_options(&users);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "1");
        assert_eq!(options[0].label, "ravi (#1)");
    }
}
