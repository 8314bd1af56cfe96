use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::OffsetDateTime;
use tracing::debug;

use super::{claims::Claims, extractors::AuthUser};
use crate::{config::JwtConfig, state::AppState};

/// Tokens are valid for two hours from issuance; there is no refresh.
pub const TOKEN_TTL: Duration = Duration::from_secs(2 * 60 * 60);

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("token claim `{0}` is missing or invalid")]
    ClaimMissing(&'static str),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Signing failures are our fault, not the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Signing(_))
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::SignatureInvalid,
            _ => Self::Malformed,
        }
    }
}

/// Signing and verification keys derived once from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: TOKEN_TTL,
        }
    }

    pub fn sign(&self, user_id: i64, email: &str) -> Result<String, TokenError> {
        self.sign_at(user_id, email, OffsetDateTime::now_utc())
    }

    pub(crate) fn sign_at(
        &self,
        user_id: i64,
        email: &str,
        issued_at: OffsetDateTime,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, email, issued_at, self.ttl);
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }

    /// Verifies the token and resolves the caller it was issued to.
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, TokenError> {
        let claims = self.verify(token)?;
        let id = claims.user_id()?;
        debug!(
            user_id = id,
            issued_at = ?claims.issued_at(),
            expires_at = ?claims.expires_at(),
            "jwt verified"
        );
        Ok(AuthUser {
            id,
            email: claims.email().map(str::to_owned),
        })
    }
}
