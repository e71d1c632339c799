//! Account page: the customer's address book.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use quitq_core::{AddressId, CityId, UserId};
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::{Address, AddressPayload, City};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireCustomer;
use crate::models::CurrentUser;
use crate::routes::{
    Flash, MessageQuery, OptionView, finish_write, load_failure, non_empty, or_dash, or_empty,
    redirect_error,
};
use crate::state::AppState;

const ACCOUNT_PATH: &str = "/customer/account";
const NOT_SIGNED_IN: &str = "Please log in to view your account details.";

/// Address form as posted by the browser.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressForm {
    pub door_number: String,
    pub apartment_name: String,
    pub landmark: String,
    pub street: String,
    pub city_id: String,
    pub postal_code: String,
    pub contact_number: String,
}

impl AddressForm {
    /// Prefill from a saved address.
    fn from_address(address: &Address) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            door_number: text(&address.door_number),
            apartment_name: text(&address.apartment_name),
            landmark: text(&address.landmark),
            street: text(&address.street),
            city_id: address.city_id.map(|c| c.to_string()).unwrap_or_default(),
            postal_code: text(&address.postal_code),
            contact_number: text(&address.contact_number),
        }
    }

    /// Validate and build the backend payload. Only the landmark may be
    /// left blank.
    ///
    /// # Errors
    ///
    /// Returns the message to show when a field is missing or the city is
    /// not a number.
    pub fn to_payload(&self, user_id: UserId) -> std::result::Result<AddressPayload, String> {
        let required = [
            &self.door_number,
            &self.apartment_name,
            &self.street,
            &self.city_id,
            &self.postal_code,
            &self.contact_number,
        ];
        if required.iter().any(|v| non_empty(v).is_none()) {
            return Err("Please fill in all the required address fields.".to_string());
        }
        let city_id = self
            .city_id
            .trim()
            .parse::<i32>()
            .map_err(|_| "Please choose a valid city.".to_string())?;

        Ok(AddressPayload {
            user_id,
            door_number: self.door_number.trim().to_string(),
            apartment_name: self.apartment_name.trim().to_string(),
            landmark: self.landmark.trim().to_string(),
            street: self.street.trim().to_string(),
            city_id: CityId::new(city_id),
            postal_code: self.postal_code.trim().to_string(),
            contact_number: self.contact_number.trim().to_string(),
            status_id: 1,
        })
    }
}

// =============================================================================
// Views
// =============================================================================

/// Saved address card.
#[derive(Debug, Clone)]
pub struct AddressView {
    pub id: String,
    pub apartment_name: String,
    pub line: String,
    pub city: String,
    pub postal_code: String,
    pub contact_number: String,
}

impl AddressView {
    fn new(address: &Address, city_names: &HashMap<CityId, String>) -> Self {
        let line = [&address.door_number, &address.street, &address.landmark]
            .into_iter()
            .filter_map(|part| part.as_deref().and_then(non_empty))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            id: address.user_address_id.to_string(),
            apartment_name: or_dash(address.apartment_name.as_deref()),
            line,
            city: address.city_id.map_or_else(
                || "-".to_string(),
                |id| {
                    city_names
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| format!("City #{id}"))
                },
            ),
            postal_code: or_dash(address.postal_code.as_deref()),
            contact_number: or_dash(address.contact_number.as_deref()),
        }
    }
}

/// Account page.
#[derive(Template, WebTemplate)]
#[template(path = "customer/account.html")]
pub struct AccountTemplate {
    pub username: String,
    pub flash: Flash,
    pub search: String,
    pub addresses: Vec<AddressView>,
    pub cities: Vec<OptionView>,
    pub form: AddressForm,
    /// Where the address form posts to.
    pub form_action: String,
    pub editing: bool,
}

async fn render(
    state: &AppState,
    user: CurrentUser,
    mut flash: Flash,
    editing: Option<AddressId>,
) -> Result<AccountTemplate> {
    let addresses = match user.user_id {
        None => {
            flash.error = Some(NOT_SIGNED_IN.to_string());
            Vec::new()
        }
        Some(user_id) => match user.customer(state).get_user_addresses(user_id).await {
            Ok(addresses) => addresses,
            Err(e) => {
                flash = flash.or_error(load_failure(e, "Failed to fetch addresses.")?.error);
                Vec::new()
            }
        },
    };
    let cities: Vec<City> = or_empty(user.stores(state).get_cities().await, "cities");

    let (form, form_action) = match editing {
        Some(id) => {
            let address = addresses
                .iter()
                .find(|a| a.user_address_id == id)
                .ok_or_else(|| AppError::NotFound(format!("address {id}")))?;
            (
                AddressForm::from_address(address),
                format!("{ACCOUNT_PATH}/addresses/{id}"),
            )
        }
        None => (
            AddressForm::default(),
            format!("{ACCOUNT_PATH}/addresses"),
        ),
    };

    let selected_city = form.city_id.trim().parse::<i32>().ok();
    let city_names: HashMap<CityId, String> = cities
        .iter()
        .map(|c| {
            (
                c.city_id,
                c.city_name.clone().unwrap_or_else(|| format!("City #{}", c.city_id)),
            )
        })
        .collect();

    Ok(AccountTemplate {
        username: user.username,
        flash,
        search: String::new(),
        addresses: addresses
            .iter()
            .map(|a| AddressView::new(a, &city_names))
            .collect(),
        cities: cities
            .iter()
            .map(|c| {
                OptionView::new(
                    c.city_id,
                    city_names.get(&c.city_id).map_or("", String::as_str),
                    Some(c.city_id.as_i32()) == selected_city,
                )
            })
            .collect(),
        form,
        form_action,
        editing: editing.is_some(),
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Address book with an empty "add" form.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Query(messages): Query<MessageQuery>,
) -> Result<AccountTemplate> {
    render(&state, user, Flash::from(messages), None).await
}

/// Address book with the form prefilled from one address.
#[instrument(skip(state, user, messages))]
pub async fn edit_address(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<AddressId>,
    Query(messages): Query<MessageQuery>,
) -> Result<AccountTemplate> {
    render(&state, user, Flash::from(messages), Some(id)).await
}

/// Save a new address.
#[instrument(skip(state, user, form))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Form(form): Form<AddressForm>,
) -> Response {
    let Some(user_id) = user.user_id else {
        return redirect_error(ACCOUNT_PATH, NOT_SIGNED_IN).into_response();
    };
    let payload = match form.to_payload(user_id) {
        Ok(payload) => payload,
        Err(message) => return redirect_error(ACCOUNT_PATH, &message).into_response(),
    };

    let result = user.customer(&state).add_user_address(&payload).await;
    finish_write(result, ACCOUNT_PATH, Some("Address saved."), "Failed to save address.")
        .into_response()
}

/// Overwrite an existing address.
#[instrument(skip(state, user, form))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<AddressId>,
    Form(form): Form<AddressForm>,
) -> Response {
    let Some(user_id) = user.user_id else {
        return redirect_error(ACCOUNT_PATH, NOT_SIGNED_IN).into_response();
    };
    let payload = match form.to_payload(user_id) {
        Ok(payload) => payload,
        Err(message) => {
            return redirect_error(&format!("{ACCOUNT_PATH}/addresses/{id}/edit"), &message)
                .into_response();
        }
    };

    let result = user.customer(&state).update_user_address(id, &payload).await;
    finish_write(result, ACCOUNT_PATH, Some("Address updated."), "Failed to save address.")
        .into_response()
}
