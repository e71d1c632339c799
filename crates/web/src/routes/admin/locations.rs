//! States and cities.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use quitq_core::{CityId, StateId};
use tracing::instrument;

use crate::api::types::{City, State as Region};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::admin::{
    ChildRow, NamedRow, finish_delete, list_or_flash, name_index, parent_name,
};
use crate::routes::{Flash, MessageQuery, or_empty};
use crate::state::AppState;

const LOCATIONS_PATH: &str = "/admin/locations";

/// Locations page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/locations.html")]
pub struct LocationsTemplate {
    pub username: String,
    pub flash: Flash,
    pub states: Vec<NamedRow>,
    pub cities: Vec<ChildRow>,
}

/// City rows labelled with their state.
#[must_use]
pub fn city_rows(states: &[Region], cities: &[City]) -> Vec<ChildRow> {
    let names = name_index(states, |s| s.state_id, |s| s.state_name.as_deref());
    cities
        .iter()
        .map(|c| ChildRow {
            id: c.city_id.to_string(),
            name: c.city_name.clone().unwrap_or_default(),
            parent: parent_name(&names, c.state_id),
        })
        .collect()
}

/// States and cities, each tolerated to fail on its own.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> Result<LocationsTemplate> {
    let mut flash = Flash::from(messages);
    let service = user.admin(&state);
    let (states, cities) = tokio::join!(service.get_states(), service.get_cities());

    let states = list_or_flash(states, &mut flash, "Failed to load states.")?;
    let cities = or_empty(cities, "cities");

    Ok(LocationsTemplate {
        username: user.username,
        flash,
        cities: city_rows(&states, &cities),
        states: states
            .iter()
            .map(|s| NamedRow::new(s.state_id, s.state_name.as_deref()))
            .collect(),
    })
}

/// Delete a state.
#[instrument(skip(state, user))]
pub async fn delete_state(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<StateId>,
) -> Response {
    let result = user.admin(&state).delete_state(id).await;
    finish_delete(result, LOCATIONS_PATH, "state").into_response()
}

/// Delete a city.
#[instrument(skip(state, user))]
pub async fn delete_city(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<CityId>,
) -> Response {
    let result = user.admin(&state).delete_city(id).await;
    finish_delete(result, LOCATIONS_PATH, "city").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_city_rows_without_states() {
        let cities: Vec<City> = serde_json::from_str(
            r#"[{"cityId": 4, "cityName": "Kochi", "stateId": 1}]"#,
        )
        .unwrap();
        let rows = city_rows(&[], &cities);
        assert_eq!(rows[0].parent, "Unknown");

        let states: Vec<Region> =
            serde_json::from_str(r#"[{"stateId": 1, "stateName": "Kerala"}]"#).unwrap();
        assert_eq!(city_rows(&states, &cities)[0].parent, "Kerala");
    }
}
