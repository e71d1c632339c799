//! Per-domain wrappers around [`ApiClient`](super::ApiClient).
//!
//! Each service owns a client (usually one carrying the session token) and
//! exposes one async method per backend endpoint. Services hold no other
//! state, so handlers build them per request.

pub mod admin;
pub mod auth;
pub mod customer;
pub mod seller;
pub mod store;

pub use admin::AdminService;
pub use auth::AuthService;
pub use customer::CustomerService;
pub use seller::SellerService;
pub use store::StoreService;
