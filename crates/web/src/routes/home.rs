//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect, Response};

use crate::filters;
use crate::middleware::OptionalAuth;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate;

/// Display the landing page, or send a signed-in user to their role home.
pub async fn home(OptionalAuth(user): OptionalAuth) -> Response {
    match user {
        Some(user) => Redirect::to(user.home()).into_response(),
        None => HomeTemplate.into_response(),
    }
}
