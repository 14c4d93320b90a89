//! In-process store.
//!
//! Mirrors the `PostgreSQL` semantics the services rely on: case-insensitive
//! unique emails, contacts that must reference an existing user,
//! `(id, owner)` matching, and ascending-id (insertion) order. Nothing is persisted.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use contact_book_core::{ContactId, Email, UserId};

use super::{ContactRepository, RepositoryError, UserRepository};
use crate::models::{Contact, ContactDraft, NewUser, User};

/// Store backed by ordered maps behind a single lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_user_id: i32,
    last_contact_id: i32,
    users: BTreeMap<UserId, StoredUser>,
    contacts: BTreeMap<ContactId, Contact>,
}

#[derive(Debug)]
struct StoredUser {
    user: User,
    password_hash: String,
}

impl Inner {
    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|s| Some(s.user.id) != except && s.user.email.same_address(email))
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser<'_>) -> Result<User, RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(new_user.email, None) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        inner.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: UserId::new(inner.last_user_id),
            name: new_user.name.to_owned(),
            email: new_user.email.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: new_user.password_hash.to_owned(),
            },
        );

        Ok(user)
    }

    async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|s| s.user.email.same_address(email))
            .map(|s| (s.user.clone(), s.password_hash.clone())))
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).map(|s| s.user.clone()))
    }

    async fn update_profile(
        &self,
        id: UserId,
        name: Option<&str>,
        email: Option<&Email>,
    ) -> Result<Option<User>, RepositoryError> {
        let mut inner = self.inner.write().await;
        if let Some(email) = email
            && inner.email_taken(email, Some(id))
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let Some(stored) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            name.clone_into(&mut stored.user.name);
        }
        if let Some(email) = email {
            stored.user.email = email.clone();
        }
        stored.user.updated_at = Utc::now();

        Ok(Some(stored.user.clone()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn list(&self, owner: UserId) -> Result<Vec<Contact>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .contacts
            .values()
            .filter(|c| c.owner == owner)
            .cloned()
            .collect())
    }

    async fn insert(
        &self,
        owner: UserId,
        draft: &ContactDraft,
    ) -> Result<Contact, RepositoryError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&owner) {
            return Err(RepositoryError::MissingOwner(owner));
        }

        inner.last_contact_id += 1;
        let now = Utc::now();
        let contact = Contact {
            id: ContactId::new(inner.last_contact_id),
            owner,
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            category: draft.category,
            created_at: now,
            updated_at: now,
        };
        inner.contacts.insert(contact.id, contact.clone());

        Ok(contact)
    }

    async fn get(&self, id: ContactId, owner: UserId) -> Result<Option<Contact>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .contacts
            .get(&id)
            .filter(|c| c.owner == owner)
            .cloned())
    }

    async fn update(
        &self,
        id: ContactId,
        owner: UserId,
        draft: &ContactDraft,
    ) -> Result<Option<Contact>, RepositoryError> {
        let mut inner = self.inner.write().await;
        let Some(contact) = inner.contacts.get_mut(&id).filter(|c| c.owner == owner) else {
            return Ok(None);
        };

        draft.name.clone_into(&mut contact.name);
        draft.email.clone_into(&mut contact.email);
        draft.phone.clone_into(&mut contact.phone);
        contact.category = draft.category;
        contact.updated_at = Utc::now();

        Ok(Some(contact.clone()))
    }

    async fn delete(&self, id: ContactId, owner: UserId) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let owned = inner.contacts.get(&id).is_some_and(|c| c.owner == owner);
        if owned {
            inner.contacts.remove(&id);
        }
        Ok(owned)
    }
}
