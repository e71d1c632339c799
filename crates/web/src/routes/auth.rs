//! Authentication route handlers.
//!
//! Handles login, registration, password reset and logout against the
//! backend's account endpoints. A successful login stores the backend token
//! in the server-side session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use quitq_core::{Email, GenderKind, UserRole, UserStatus};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::types::{RegisterRequest, ResetPasswordRequest};
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::{MessageQuery, OptionView, non_empty, parse_opt, redirect_error, redirect_success};
use crate::state::AppState;

/// Minimum length of a new password.
const MIN_PASSWORD_LEN: usize = 6;

const REGISTER_FAILED: &str = "Registration failed. Please try again later.";
const RESET_FAILED: &str = "An unexpected error occurred. Please try again.";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `yyyy-mm-dd` from the date input.
    pub dob: String,
    pub contact_number: String,
    pub gender_id: Option<String>,
}

/// Reset password form data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetPasswordForm {
    pub email: String,
    pub new_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub username: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub form: RegisterForm,
    pub genders: Vec<OptionView>,
}

impl RegisterTemplate {
    fn new(error: Option<String>, form: RegisterForm) -> Self {
        let selected = parse_opt::<i32>(form.gender_id.as_deref()).unwrap_or(1);
        let genders = GenderKind::ALL
            .iter()
            .map(|g| OptionView::new(g.code(), g.label(), g.code() == selected))
            .collect();
        Self {
            error,
            form,
            genders,
        }
    }
}

/// Reset password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub error: Option<String>,
    pub email: String,
}

// =============================================================================
// Validation
// =============================================================================

/// Check the registration form and build the backend request.
///
/// # Errors
///
/// Returns the message to show when a field is missing or malformed.
pub fn validate_registration(form: &RegisterForm) -> Result<RegisterRequest, String> {
    let required = [
        &form.username,
        &form.password,
        &form.email,
        &form.first_name,
        &form.last_name,
        &form.dob,
        &form.contact_number,
    ];
    if required.iter().any(|v| non_empty(v).is_none()) {
        return Err("Please fill in all the required fields.".to_string());
    }

    let email = Email::parse(&form.email)
        .map_err(|_| "Please enter a valid email address.".to_string())?;
    let dob = NaiveDate::parse_from_str(form.dob.trim(), "%Y-%m-%d")
        .map_err(|_| "Please enter a valid date of birth.".to_string())?;
    let gender_id = parse_opt::<i32>(form.gender_id.as_deref())
        .unwrap_or_else(|| GenderKind::default().code());

    Ok(RegisterRequest {
        username: form.username.trim().to_string(),
        password: form.password.clone(),
        email: email.into_inner(),
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        dob: format!("{}T00:00:00", dob.format("%Y-%m-%d")),
        contact_number: form.contact_number.trim().to_string(),
        gender_id,
        user_status_id: UserStatus::Active.code(),
        user_type_id: UserRole::Customer.code(),
    })
}

/// Check the reset form and build the backend request.
///
/// # Errors
///
/// Returns the message to show when a field is missing or the password is
/// too short.
pub fn validate_reset(form: &ResetPasswordForm) -> Result<ResetPasswordRequest, String> {
    let (Some(email), Some(_)) = (non_empty(&form.email), non_empty(&form.new_password)) else {
        return Err("Please fill in both email and new password fields.".to_string());
    };
    if form.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        ));
    }
    Ok(ResetPasswordRequest {
        email: email.to_string(),
        new_password: form.new_password.clone(),
    })
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if let Some(user) = user {
        return Redirect::to(user.home()).into_response();
    }
    LoginTemplate {
        error: query.error,
        success: query.success,
        username: String::new(),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let failed = |message: &str| {
        LoginTemplate {
            error: Some(message.to_string()),
            success: None,
            username: form.username.clone(),
        }
        .into_response()
    };

    let Some(username) = non_empty(&form.username) else {
        return failed("Username is required.");
    };

    match state.auth().login(username, &form.password).await {
        Ok(response) => {
            let Some(user) = CurrentUser::from_login(&response, username) else {
                tracing::info!("Login rejected: no token in response");
                return failed("Invalid credentials");
            };

            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {}", e);
                return failed("Login failed");
            }

            if let Some(user_id) = user.user_id {
                set_sentry_user(&user_id, Some(&user.username));
            }
            add_breadcrumb("auth", "Signed in", Some(&[("role", user.role.label())]));

            Redirect::to(user.home()).into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            failed("Login failed")
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate::new(query.error, RegisterForm::default())
}

/// Handle registration form submission.
#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let request = match validate_registration(&form) {
        Ok(request) => request,
        Err(message) => return RegisterTemplate::new(Some(message), form).into_response(),
    };

    match state.auth().register(&request).await {
        Ok(response) if response.success => {
            redirect_success("/login", "Registration successful, please login").into_response()
        }
        Ok(response) => {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Registration failed".to_string());
            RegisterTemplate::new(Some(message), form).into_response()
        }
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            RegisterTemplate::new(Some(e.user_message(REGISTER_FAILED)), form).into_response()
        }
    }
}

// =============================================================================
// Password Reset Routes
// =============================================================================

/// Display the password reset page.
pub async fn reset_password_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    ResetPasswordTemplate {
        error: query.error,
        email: String::new(),
    }
}

/// Handle reset password form submission.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let failed = |message: String| {
        ResetPasswordTemplate {
            error: Some(message),
            email: form.email.clone(),
        }
        .into_response()
    };

    let request = match validate_reset(&form) {
        Ok(request) => request,
        Err(message) => return failed(message),
    };

    match state.auth().reset_password(&request).await {
        Ok(response) if response.success => {
            redirect_success("/login", "Reset password successfully").into_response()
        }
        Ok(response) => failed(
            response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Failed to reset password.".to_string()),
        ),
        Err(e) => {
            tracing::warn!("Password reset failed: {}", e);
            failed(e.user_message(RESET_FAILED))
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Destroys the session; the backend token goes with it.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
        return redirect_error("/login", "Logout failed. Please try again.").into_response();
    }
    clear_sentry_user();

    Redirect::to("/login").into_response()
}
