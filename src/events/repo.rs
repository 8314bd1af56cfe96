use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Event, EventFields};
use crate::db::StoreError;

#[async_trait]
pub trait EventRepo: Send + Sync {
    async fn insert(&self, fields: &EventFields, owner_id: i64) -> Result<Event, StoreError>;
    async fn find(&self, id: i64) -> Result<Option<Event>, StoreError>;
    /// Every event in insertion order.
    async fn list(&self) -> Result<Vec<Event>, StoreError>;
    async fn update(&self, id: i64, fields: &EventFields) -> Result<Option<Event>, StoreError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
    async fn delete_all(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait RegistrationRepo: Send + Sync {
    /// Returns `false` when the pair was already present.
    async fn insert(&self, event_id: i64, user_id: i64) -> Result<bool, StoreError>;
    /// Returns `false` when there was nothing to remove.
    async fn delete(&self, event_id: i64, user_id: i64) -> Result<bool, StoreError>;
}

const EVENT_COLUMNS: &str = "id, name, description, location, start_time, created_by";

#[derive(Clone)]
pub struct PgEventRepo {
    db: PgPool,
}

impl PgEventRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepo for PgEventRepo {
    async fn insert(&self, fields: &EventFields, owner_id: i64) -> Result<Event, StoreError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (name, description, location, start_time, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(fields.start_time)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;
        Ok(event)
    }

    async fn find(&self, id: i64) -> Result<Option<Event>, StoreError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(event)
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY id"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(events)
    }

    async fn update(&self, id: i64, fields: &EventFields) -> Result<Option<Event>, StoreError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = $2, description = $3, location = $4, start_time = $5
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(fields.start_time)
        .fetch_optional(&self.db)
        .await?;
        Ok(event)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM events").execute(&self.db).await?;
        Ok(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgRegistrationRepo {
    db: PgPool,
}

impl PgRegistrationRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RegistrationRepo for PgRegistrationRepo {
    async fn insert(&self, event_id: i64, user_id: i64) -> Result<bool, StoreError> {
        // The unique constraint decides; concurrent duplicates become no-ops.
        let result = sqlx::query(
            r#"
            INSERT INTO registrations (event_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (event_id, user_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, event_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM registrations WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
