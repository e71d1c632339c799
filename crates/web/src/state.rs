//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError, AuthService};
use crate::config::WebConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds the configuration
/// and the unauthenticated REST client. Per-user clients are derived from
/// it with the session token (see `CurrentUser`).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    api: ApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: WebConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the web client configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get the REST client without credentials.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Account endpoints that need no token.
    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.inner.api.clone())
    }

    /// Build the browser-facing URL of a product image.
    ///
    /// Relative paths are joined onto the asset base URL; absolute URLs pass
    /// through. A missing or unparsable path yields the placeholder image.
    #[must_use]
    pub fn image_url(&self, path: Option<&str>) -> String {
        image_url(&self.inner.config.api.asset_base_url, path)
    }
}

/// Shown wherever a product has no image.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/250x250.png?text=No+Image";

pub(crate) fn image_url(base: &url::Url, path: Option<&str>) -> String {
    let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) else {
        return PLACEHOLDER_IMAGE.to_string();
    };
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    base.join(path.trim_start_matches('/'))
        .map_or_else(|_| PLACEHOLDER_IMAGE.to_string(), String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl AppState {
    /// State whose REST client points at `api_base_url`.
    pub(crate) fn for_tests(api_base_url: &str) -> Self {
        Self::new(WebConfig::for_tests(api_base_url)).unwrap()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_joins_asset_base() {
        let base = url::Url::parse("http://localhost:5193/").unwrap();
        assert_eq!(
            image_url(&base, Some("images/mug.png")),
            "http://localhost:5193/images/mug.png"
        );
        assert_eq!(
            image_url(&base, Some("/images/mug.png")),
            "http://localhost:5193/images/mug.png"
        );
    }

    #[test]
    fn test_image_url_fallbacks() {
        let base = url::Url::parse("http://localhost:5193/").unwrap();
        assert_eq!(image_url(&base, None), PLACEHOLDER_IMAGE);
        assert_eq!(image_url(&base, Some("  ")), PLACEHOLDER_IMAGE);
        assert_eq!(
            image_url(&base, Some("https://cdn.quitq.in/a.png")),
            "https://cdn.quitq.in/a.png"
        );
    }
}
