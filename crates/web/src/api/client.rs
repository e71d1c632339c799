//! Shared HTTP client for the QuitQ REST backend.
//!
//! Every service wraps one [`ApiClient`]. The client joins endpoint paths
//! onto the configured base URL, attaches the session's bearer token and
//! turns non-success responses into [`ApiError::Status`].

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::{ApiError, extract_error_message};
use crate::config::ApiConfig;

/// HTTP client bound to one backend and, optionally, one user's token.
#[derive(Clone)]
pub struct ApiClient {
    /// Pooled HTTP client shared by every clone.
    client: Client,
    /// Base URL every endpoint path is joined onto.
    base_url: Url,
    /// Bearer token of the signed-in user.
    token: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create an anonymous client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: None,
        })
    }

    /// A copy of this client that sends `token` as a bearer credential.
    #[must_use]
    pub fn authorized(&self, token: &str) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(SecretString::from(token.to_owned())),
        }
    }

    /// The backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// A leading `/` is ignored so that `/api/cart` and `api/cart` resolve
    /// to the same place even when the base URL has a path prefix.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// `GET` a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, self.endpoint(path)?);
        decode(&self.execute(request).await?)
    }

    /// `GET` a JSON document with query parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().extend_pairs(query);
        let request = self.request(Method::GET, url);
        decode(&self.execute(request).await?)
    }

    /// `GET` a JSON array. A `null` or empty body is an empty list.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        Ok(self.get::<Option<Vec<T>>>(path).await?.unwrap_or_default())
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, self.endpoint(path)?).json(body);
        decode(&self.execute(request).await?)
    }

    /// `POST` a JSON body and return the raw response text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status.
    pub async fn post_json_text<B>(&self, path: &str, body: &B) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, self.endpoint(path)?).json(body);
        self.execute(request).await
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, self.endpoint(path)?).json(body);
        decode(&self.execute(request).await?)
    }

    /// Send a JSON body where the response body is irrelevant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status.
    pub async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(method, self.endpoint(path)?).json(body);
        self.execute(request).await.map(drop)
    }

    /// Send a bodiless request where the response body is irrelevant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status.
    pub async fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        let request = self.request(method, self.endpoint(path)?);
        self.execute(request).await.map(drop)
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, path).await
    }

    /// Send a `multipart/form-data` body where the response body is
    /// irrelevant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status.
    pub async fn send_multipart(&self, method: Method, path: &str, form: Form) -> Result<(), ApiError> {
        let request = self.request(method, self.endpoint(path)?).multipart(form);
        self.execute(request).await.map(drop)
    }

    /// Check whether the backend answers HTTP at all.
    ///
    /// Any response, including 404, counts as reachable.
    pub async fn ping(&self) -> bool {
        match self.client.get(self.base_url.clone()).send().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Backend unreachable");
                false
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    #[instrument(skip_all)]
    async fn execute(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_owned();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body);
            debug!(%status, path = %url, ?message, "Backend rejected request");
            return Err(ApiError::Status { status, message });
        }

        let body = response.text().await?;
        debug!(%status, path = %url, bytes = body.len(), "Backend request succeeded");
        Ok(body)
    }
}

/// Decode a response body, treating an empty body as JSON `null`.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = body.trim();
    let text = if text.is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: i32,
    }

    fn client_for(server: &MockServer) -> ApiClient {
        let config = ApiConfig::for_base_url(&server.uri()).unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_ignores_leading_slash() {
        let config = ApiConfig::for_base_url("http://localhost:5193/backend").unwrap();
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("/api/cart").unwrap().as_str(),
            "http://localhost:5193/backend/api/cart"
        );
        assert_eq!(
            client.endpoint("api/cart").unwrap().as_str(),
            "http://localhost:5193/backend/api/cart"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ApiConfig::for_base_url("http://localhost:5193").unwrap();
        let client = ApiClient::new(&config).unwrap().authorized("secret-jwt");
        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret-jwt"));
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/things/1"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).authorized("tok-123");
        let thing: Thing = client.get("/api/things/1").await.unwrap();
        assert_eq!(thing, Thing { id: 1 });
    }

    #[tokio::test]
    async fn test_get_with_query_encodes_pairs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/search"))
            .and(query_param("query", "red shoes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let found: Vec<Thing> = client_for(&server)
            .get_with_query("api/products/search", &[("query", "red shoes")])
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_get_list_treats_empty_body_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/things"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let things: Vec<Thing> = client_for(&server).get_list("/api/things").await.unwrap();
        assert!(things.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_carries_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/things"))
            .and(body_json(serde_json::json!({"id": 7})))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"message": "Thing already exists"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_json(Method::POST, "/api/things", &serde_json::json!({"id": 7}))
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
                assert_eq!(message.as_deref(), Some("Thing already exists"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/things/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get::<Thing>("/api/things/1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_ping_counts_any_response() {
        let server = MockServer::start().await;
        assert!(client_for(&server).ping().await);

        let config = ApiConfig::for_base_url("http://127.0.0.1:9").unwrap();
        let unreachable = ApiClient::new(&config).unwrap();
        assert!(!unreachable.ping().await);
    }
}
