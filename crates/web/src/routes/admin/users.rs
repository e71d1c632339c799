//! User list with a details panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use quitq_core::{GenderKind, UserId};
use tracing::instrument;

use crate::api::types::User;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentUser;
use crate::routes::admin::{finish_delete, list_or_flash};
use crate::routes::{Flash, MessageQuery, or_dash};
use crate::state::AppState;

const USERS_PATH: &str = "/admin/users";

/// Row of the user table.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub selected: bool,
}

impl UserRowView {
    fn new(user: &User, selected: Option<UserId>) -> Self {
        let name = user.full_name();
        Self {
            id: user.user_id.to_string(),
            name: if name.is_empty() {
                "Unknown".to_string()
            } else {
                name
            },
            email: user.email.clone().unwrap_or_else(|| "Unknown".to_string()),
            role: user.role_label(),
            selected: selected == Some(user.user_id),
        }
    }
}

/// Details panel for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetailView {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub dob: String,
    pub contact_number: String,
    pub role: &'static str,
    pub gender: &'static str,
    pub status: &'static str,
}

impl From<&User> for UserDetailView {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            username: or_dash(user.username.as_deref()),
            name: or_dash(Some(&user.full_name())),
            email: or_dash(user.email.as_deref()),
            // "1990-05-01T00:00:00" shows as its date part.
            dob: or_dash(user.dob.as_deref().map(|d| d.split('T').next().unwrap_or(d))),
            contact_number: or_dash(user.contact_number.as_deref()),
            role: user.role_label(),
            gender: user
                .gender_id
                .and_then(|code| GenderKind::try_from(code).ok())
                .map_or("Unknown", GenderKind::label),
            status: user.status_label(),
        }
    }
}

/// Users page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub username: String,
    pub flash: Flash,
    pub users: Vec<UserRowView>,
    pub detail: Option<UserDetailView>,
}

async fn render(
    state: &AppState,
    user: CurrentUser,
    mut flash: Flash,
    selected: Option<UserId>,
) -> Result<UsersTemplate> {
    let users = list_or_flash(
        user.admin(state).get_users().await,
        &mut flash,
        "Failed to load users.",
    )?;

    // The backend has no single-user endpoint; details come from the list.
    let detail = match selected {
        Some(id) => Some(
            users
                .iter()
                .find(|u| u.user_id == id)
                .map(UserDetailView::from)
                .ok_or_else(|| AppError::NotFound(format!("user {id}")))?,
        ),
        None => None,
    };

    Ok(UsersTemplate {
        username: user.username,
        flash,
        users: users.iter().map(|u| UserRowView::new(u, selected)).collect(),
        detail,
    })
}

/// All users.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> Result<UsersTemplate> {
    render(&state, user, Flash::from(messages), None).await
}

/// All users with one user's details open.
#[instrument(skip(state, user, messages))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<UserId>,
    Query(messages): Query<MessageQuery>,
) -> Result<UsersTemplate> {
    render(&state, user, Flash::from(messages), Some(id)).await
}

/// Delete a user.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<UserId>,
) -> Response {
    let result = user.admin(&state).delete_user(id).await;
    finish_delete(result, USERS_PATH, "user").into_response()
}
