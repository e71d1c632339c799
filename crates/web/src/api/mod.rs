//! Client for the QuitQ REST backend.
//!
//! # Layout
//!
//! - [`ApiClient`]: one reqwest client, base URL and optional bearer token
//! - [`services`]: one struct per backend domain, one method per endpoint
//! - [`types`]: JSON request and response shapes

pub mod client;
pub mod error;
pub mod services;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, extract_error_message};
pub use services::{AdminService, AuthService, CustomerService, SellerService, StoreService};
