//! Shared harness for the web client's end-to-end tests.
//!
//! Every test drives the real router in-process while a `wiremock` server
//! plays the QuitQ REST backend. Sessions live in the router's memory store,
//! so a test carries the session cookie from one request to the next the
//! way a browser would.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use quitq_web::config::{ApiConfig, WebConfig};
use quitq_web::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A captured response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Target of a redirect, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Web client wired to a mock backend, with a browser-like cookie jar of
/// one session cookie.
pub struct TestContext {
    pub backend: MockServer,
    app: Router,
    cookie: Option<String>,
}

impl TestContext {
    /// Start a mock backend and build the application against it.
    pub async fn new() -> Self {
        let backend = MockServer::start().await;
        let config = WebConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            api: ApiConfig::for_base_url(&backend.uri()).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let app = quitq_web::app(AppState::new(config).unwrap());

        Self {
            backend,
            app,
            cookie: None,
        }
    }

    /// Mount a JSON `GET` response on the mock backend.
    pub async fn mock_get(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.backend)
            .await;
    }

    /// Mount a bare status response on the mock backend.
    pub async fn mock_status(&self, verb: &str, route: &str, status: u16) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.backend)
            .await;
    }

    /// Make the backend accept a login and answer with `role`.
    pub async fn mock_login(&self, user_id: i32, username: &str, role: &str) {
        Mock::given(method("POST"))
            .and(path("/api/token/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": format!("token-{user_id}"),
                "username": username,
                "userId": user_id,
                "role": role,
            })))
            .mount(&self.backend)
            .await;
    }

    /// Sign in through the login form. Keeps the session cookie.
    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        let form = format!("username={username}&password={password}");
        self.post_form("/login", &form).await
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, verb: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(verb).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            // "name=value; Path=/; HttpOnly" keeps only "name=value".
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
