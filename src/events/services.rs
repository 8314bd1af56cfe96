use tracing::{info, warn};

use super::{
    repo::EventRepo,
    repo_types::{Event, EventFields},
};
use crate::{auth::ownership::ensure_owner, db::StoreError, error::AppError};

pub async fn create_event(
    events: &dyn EventRepo,
    fields: &EventFields,
    owner_id: i64,
) -> Result<Event, AppError> {
    let event = match events.insert(fields, owner_id).await {
        Ok(event) => event,
        // Token outlived its user row.
        Err(StoreError::ForeignKeyViolation) => return Err(AppError::NotFound("user")),
        Err(e) => return Err(e.into()),
    };
    info!(event_id = event.id, owner_id, "event created");
    Ok(event)
}

pub async fn get_event(events: &dyn EventRepo, id: i64) -> Result<Event, AppError> {
    events.find(id).await?.ok_or(AppError::NotFound("event"))
}

pub async fn list_events(events: &dyn EventRepo) -> Result<Vec<Event>, AppError> {
    Ok(events.list().await?)
}

/// Overwrites the mutable fields; only the owner may do so.
pub async fn update_event(
    events: &dyn EventRepo,
    id: i64,
    fields: &EventFields,
    requesting_user_id: i64,
) -> Result<Event, AppError> {
    let existing = get_event(events, id).await?;
    if let Err(e) = ensure_owner(&existing, requesting_user_id) {
        warn!(event_id = id, requesting_user_id, "update by non-owner");
        return Err(e);
    }

    let updated = events
        .update(id, fields)
        .await?
        .ok_or(AppError::NotFound("event"))?;
    info!(event_id = id, "event updated");
    Ok(updated)
}

pub async fn delete_event(
    events: &dyn EventRepo,
    id: i64,
    requesting_user_id: i64,
) -> Result<(), AppError> {
    let existing = get_event(events, id).await?;
    if let Err(e) = ensure_owner(&existing, requesting_user_id) {
        warn!(event_id = id, requesting_user_id, "delete by non-owner");
        return Err(e);
    }

    if !events.delete(id).await? {
        return Err(AppError::NotFound("event"));
    }
    info!(event_id = id, "event deleted");
    Ok(())
}

/// Unconditional wipe; callers decide who may trigger it.
pub async fn delete_all_events(events: &dyn EventRepo) -> Result<u64, AppError> {
    let deleted = events.delete_all().await?;
    warn!(deleted, "all events deleted");
    Ok(deleted)
}
