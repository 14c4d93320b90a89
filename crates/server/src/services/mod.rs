//! Business logic services.

pub mod auth;
pub mod contacts;
pub mod token;

pub use auth::{AuthError, AuthService, Registration};
pub use contacts::{ContactError, ContactPatch, ContactService, NewContact};
pub use token::TokenKeys;
