//! QuitQ Core - Shared types library.
//!
//! This crate provides the domain types shared by the QuitQ components:
//! - `web` - The customer, seller and admin web client
//! - `integration-tests` - End-to-end tests against a mock REST backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The REST
//! backend owns every record; these types only give the client a typed view
//! of ids, money, emails and the fixed enumerations the backend encodes as
//! integers or strings.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, roles and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
