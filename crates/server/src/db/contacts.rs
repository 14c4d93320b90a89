//! `PostgreSQL` contact queries.
//!
//! Every statement touching an existing row filters on `user_id` as well as
//! `id`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use contact_book_core::{ContactCategory, ContactId, UserId};

use super::{ContactRepository, PgStore, RepositoryError, missing_owner_on_fk};
use crate::models::{Contact, ContactDraft};

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: i32,
    user_id: i32,
    name: String,
    email: String,
    phone: String,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let category: ContactCategory = row
            .category
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("contact {}: {e}", row.id)))?;

        Ok(Self {
            id: ContactId::new(row.id),
            owner: UserId::new(row.user_id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ContactRepository for PgStore {
    #[instrument(skip(self))]
    async fn list(&self, owner: UserId) -> Result<Vec<Contact>, RepositoryError> {
        let rows: Vec<ContactRow> = sqlx::query_as(
            r"
            SELECT id, user_id, name, email, phone, category, created_at, updated_at
            FROM contacts
            WHERE user_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded contacts");
        rows.into_iter().map(Contact::try_from).collect()
    }

    #[instrument(skip(self, draft))]
    async fn insert(
        &self,
        owner: UserId,
        draft: &ContactDraft,
    ) -> Result<Contact, RepositoryError> {
        let row: ContactRow = sqlx::query_as(
            r"
            INSERT INTO contacts (user_id, name, email, phone, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, email, phone, category, created_at, updated_at
            ",
        )
        .bind(owner)
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(draft.category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_owner_on_fk(e, owner))?;

        row.try_into()
    }

    async fn get(&self, id: ContactId, owner: UserId) -> Result<Option<Contact>, RepositoryError> {
        let row: Option<ContactRow> = sqlx::query_as(
            r"
            SELECT id, user_id, name, email, phone, category, created_at, updated_at
            FROM contacts
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Contact::try_from).transpose()
    }

    #[instrument(skip(self, draft))]
    async fn update(
        &self,
        id: ContactId,
        owner: UserId,
        draft: &ContactDraft,
    ) -> Result<Option<Contact>, RepositoryError> {
        let row: Option<ContactRow> = sqlx::query_as(
            r"
            UPDATE contacts
            SET name = $3, email = $4, phone = $5, category = $6, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, email, phone, category, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(owner)
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(draft.category.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Contact::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ContactId, owner: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM contacts
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
