use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, SignupRequest, SignupResponse},
        repo_types::PublicUser,
        services::{create_user, is_valid_email, list_users, validate_credentials},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(get_users))
}

fn check_credentials_shape(email: &str, password: &str) -> Result<(), AppError> {
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let Json(payload) = payload?;
    check_credentials_shape(&payload.email, &payload.password)?;

    let id = create_user(state.users.as_ref(), &payload.email, &payload.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".into(),
            user: PublicUser {
                id,
                email: payload.email,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    check_credentials_shape(&payload.email, &payload.password)?;

    let id = validate_credentials(state.users.as_ref(), &payload.email, &payload.password).await?;
    let token = state.jwt.sign(id, &payload.email)?;

    info!(user_id = id, email = %payload.email, "user logged in");
    Ok(Json(LoginResponse {
        message: "User logged in successfully".into(),
        token,
        user: PublicUser {
            id,
            email: payload.email,
        },
    }))
}

#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, AppError> {
    Ok(Json(list_users(state.users.as_ref()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_check_rejects_bad_email_and_empty_password() {
        assert!(matches!(
            check_credentials_shape("nope", "pw123"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            check_credentials_shape("alice@example.com", ""),
            Err(AppError::Validation(_))
        ));
        assert!(check_credentials_shape("alice@example.com", "pw123").is_ok());
    }

    #[test]
    fn signup_response_does_not_echo_password() {
        let response = SignupResponse {
            message: "User created successfully".into(),
            user: PublicUser {
                id: 1,
                email: "test@example.com".to_string(),
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(!json.contains("password"));
    }
}
