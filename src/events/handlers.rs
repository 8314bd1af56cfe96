use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{
        DeleteAllResponse, EventRequest, MessageResponse, RegistrationResponse,
        RegistrationStatus,
    },
    registrations::{cancel_registration, register},
    repo_types::Event,
    services::{
        create_event, delete_all_events, delete_event, get_event, list_events, update_event,
    },
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

// --- routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(get_events))
        .route("/events/:id", get(get_event_by_id))
}

/// Every route here must sit behind `require_auth`.
pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(post_event).delete(delete_events))
        .route("/events/:id", axum::routing::put(put_event).delete(delete_event_by_id))
        .route(
            "/events/:id/register",
            post(register_for_event).delete(cancel_registration_for_event),
        )
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn get_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(list_events(state.events.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn get_event_by_id(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Event>, AppError> {
    let Path(id) = id?;
    Ok(Json(get_event(state.events.as_ref(), id).await?))
}

#[instrument(skip(state, payload))]
pub async fn post_event(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let Json(payload) = payload?;
    let fields = payload.into_fields()?;
    let event = create_event(state.events.as_ref(), &fields, user.id).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[instrument(skip(state, payload))]
pub async fn put_event(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let fields = payload.into_fields()?;
    let event = update_event(state.events.as_ref(), id, &fields, user.id).await?;
    Ok(Json(event))
}

#[instrument(skip(state))]
pub async fn delete_event_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    delete_event(state.events.as_ref(), id, user.id).await?;
    Ok(Json(MessageResponse {
        message: "Event deleted successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DeleteAllResponse>, AppError> {
    // Keyed on the user id: the email claim is self-chosen at signup.
    if !state.config.is_admin(user.id) {
        warn!(user_id = user.id, email = ?user.email, "delete-all refused for non-admin");
        return Err(AppError::Forbidden("only administrators can delete all events"));
    }

    let deleted = delete_all_events(state.events.as_ref()).await?;
    info!(user_id = user.id, deleted, "all events deleted by admin");
    Ok(Json(DeleteAllResponse {
        message: "All events deleted".into(),
        deleted,
    }))
}

#[instrument(skip(state))]
pub async fn register_for_event(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    let Path(event_id) = id?;
    let status = register(
        state.events.as_ref(),
        state.registrations.as_ref(),
        event_id,
        user.id,
    )
    .await?;

    let code = match status {
        RegistrationStatus::Registered => StatusCode::CREATED,
        RegistrationStatus::AlreadyRegistered => StatusCode::OK,
    };
    Ok((
        code,
        Json(RegistrationResponse {
            event_id,
            user_id: user.id,
            status,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn cancel_registration_for_event(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(event_id) = id?;
    cancel_registration(state.registrations.as_ref(), event_id, user.id).await?;
    Ok(Json(MessageResponse {
        message: "Registration cancelled".into(),
    }))
}
