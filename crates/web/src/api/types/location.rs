//! States and cities.

use quitq_core::{CityId, StateId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub state_id: StateId,
    pub state_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub city_id: CityId,
    pub city_name: Option<String>,
    pub state_id: Option<StateId>,
}
