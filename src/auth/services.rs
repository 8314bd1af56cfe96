use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        password::{burn_dummy_verification, hash_password, verify_password},
        repo::UserRepo,
        repo_types::PublicUser,
    },
    db::StoreError,
    error::AppError,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Hashes the password off the async workers and stores the new user.
pub async fn create_user(
    users: &dyn UserRepo,
    email: &str,
    password: &str,
) -> Result<i64, AppError> {
    let plain = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task failed")??;

    let user = match users.insert(email, &hash).await {
        Ok(user) => user,
        Err(StoreError::UniqueViolation) => {
            warn!(email = %email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, email = %user.email, "user created");
    Ok(user.id)
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn validate_credentials(
    users: &dyn UserRepo,
    email: &str,
    password: &str,
) -> Result<i64, AppError> {
    let plain = password.to_owned();
    let Some(user) = users.find_by_email(email).await? else {
        tokio::task::spawn_blocking(move || burn_dummy_verification(&plain))
            .await
            .context("password verification task failed")?;
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .context("password verification task failed")??;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    Ok(user.id)
}

pub async fn list_users(users: &dyn UserRepo) -> Result<Vec<PublicUser>, AppError> {
    Ok(users.list().await?)
}
