//! Core types for the contact book.

pub mod category;
pub mod email;
pub mod id;

pub use category::{CategoryError, ContactCategory};
pub use email::{Email, EmailError};
pub use id::{ContactId, UserId};
