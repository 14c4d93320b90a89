//! Domain models.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`]. Their `Serialize` output is the public JSON shape, which
//! keeps the `_id` / camelCase field names the web client expects.

pub mod contact;
pub mod user;

pub use contact::{Contact, ContactDraft};
pub use user::{NewUser, User};
