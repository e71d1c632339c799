//! Types kept in the server-side session.

pub mod session;

pub use session::{CurrentUser, keys as session_keys, role_home};
