//! Contact service.
//!
//! Every operation takes the owner explicitly. Handlers pass the user id bound
//! by the auth extractor, never anything from the request body.

mod error;

pub use error::ContactError;

use serde::Deserialize;
use tracing::{info, instrument};

use contact_book_core::{ContactCategory, ContactId, UserId};

use crate::db::{ContactRepository, RepositoryError};
use crate::models::{Contact, ContactDraft};

/// Contact fields as submitted on create.
///
/// Unknown keys (including any attempt to set `user`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
}

/// Partial update. Present fields replace the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
}

/// Contact service.
pub struct ContactService<'a> {
    contacts: &'a dyn ContactRepository,
}

impl<'a> ContactService<'a> {
    /// Create a new contact service.
    #[must_use]
    pub const fn new(contacts: &'a dyn ContactRepository) -> Self {
        Self { contacts }
    }

    /// All of `owner`'s contacts in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::Repository` if the store fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<Contact>, ContactError> {
        Ok(self.contacts.list(owner).await?)
    }

    /// Create a contact owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::Validation` if a required field is missing or
    /// blank, or the category is unknown, and `ContactError::OwnerNotFound`
    /// if `owner` has been removed.
    #[instrument(skip(self, input))]
    pub async fn create(&self, owner: UserId, input: NewContact) -> Result<Contact, ContactError> {
        let draft = validate(
            input.name,
            input.email,
            input.phone,
            input.category.as_deref(),
            ContactCategory::default(),
        )?;

        let contact = self
            .contacts
            .insert(owner, &draft)
            .await
            .map_err(|e| match e {
                RepositoryError::MissingOwner(_) => ContactError::OwnerNotFound,
                other => ContactError::Repository(other),
            })?;
        info!(contact_id = %contact.id, "Contact created");
        Ok(contact)
    }

    /// Apply `patch` to one of `owner`'s contacts.
    ///
    /// `id` is the raw path segment; anything that is not a valid id is
    /// treated as not found.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::NotFound` if `owner` has no such contact and
    /// `ContactError::Validation` if the patched contact is invalid.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        owner: UserId,
        id: &str,
        patch: ContactPatch,
    ) -> Result<Contact, ContactError> {
        let id = parse_id(id)?;
        let existing = self
            .contacts
            .get(id, owner)
            .await?
            .ok_or(ContactError::NotFound)?;

        let draft = validate(
            Some(patch.name.unwrap_or(existing.name)),
            Some(patch.email.unwrap_or(existing.email)),
            Some(patch.phone.unwrap_or(existing.phone)),
            patch.category.as_deref(),
            existing.category,
        )?;

        // Last write wins; the row may have been deleted since the fetch.
        let contact = self
            .contacts
            .update(id, owner, &draft)
            .await?
            .ok_or(ContactError::NotFound)?;

        info!(contact_id = %contact.id, "Contact updated");
        Ok(contact)
    }

    /// Delete one of `owner`'s contacts.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::NotFound` if `owner` has no such contact.
    #[instrument(skip(self))]
    pub async fn delete(&self, owner: UserId, id: &str) -> Result<(), ContactError> {
        let id = parse_id(id)?;
        if !self.contacts.delete(id, owner).await? {
            return Err(ContactError::NotFound);
        }

        info!(contact_id = %id, "Contact deleted");
        Ok(())
    }
}

fn parse_id(raw: &str) -> Result<ContactId, ContactError> {
    raw.parse().map_err(|_| ContactError::NotFound)
}

/// Whitespace-only counts as missing; the value is kept as submitted.
fn required(field: &str, value: Option<String>) -> Result<String, ContactError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ContactError::Validation(format!("{field} is required"))),
    }
}

fn validate(
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    category: Option<&str>,
    fallback: ContactCategory,
) -> Result<ContactDraft, ContactError> {
    let category = match category {
        Some(raw) => raw
            .parse()
            .map_err(|e: contact_book_core::CategoryError| ContactError::Validation(e.to_string()))?,
        None => fallback,
    };

    Ok(ContactDraft {
        name: required("name", name)?,
        email: required("email", email)?,
        phone: required("phone", phone)?,
        category,
    })
}
