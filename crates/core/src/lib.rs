//! Contact Book Core - Shared domain types.
//!
//! Types used by both the HTTP server and the CLI:
//! - [`UserId`] / [`ContactId`] - type-safe row identifiers
//! - [`Email`] - validated, case-insensitively comparable email address
//! - [`ContactCategory`] - the fixed set of contact categories
//!
//! The core crate performs no I/O. Database encodings for the IDs are
//! available behind the `postgres` feature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
