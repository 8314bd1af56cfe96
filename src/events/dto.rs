use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::EventFields;
use crate::error::AppError;

/// Body of `POST /events` and `PUT /events/:id`.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
}

impl EventRequest {
    pub fn into_fields(self) -> Result<EventFields, AppError> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }
        Ok(EventFields {
            name: self.name,
            description: self.description,
            location: self.location,
            start_time: self.start_time,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub message: String,
    pub deleted: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Registered,
    AlreadyRegistered,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub event_id: i64,
    pub user_id: i64,
    pub status: RegistrationStatus,
}
