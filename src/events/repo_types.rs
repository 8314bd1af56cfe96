use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::auth::ownership::Owned;

/// Event record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    pub created_by: i64, // owning user
}

/// The owner-editable part of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_time: OffsetDateTime,
}

impl Owned for Event {
    fn owner_id(&self) -> i64 {
        self.created_by
    }
}

#[cfg(test)]
impl Event {
    pub fn fields(&self) -> EventFields {
        EventFields {
            name: self.name.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start_time: self.start_time,
        }
    }
}
