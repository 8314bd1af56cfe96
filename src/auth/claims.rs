use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use time::OffsetDateTime;

use super::jwt::TokenError;

pub const EMAIL_CLAIM: &str = "email";
pub const USER_ID_CLAIM: &str = "userID";
pub const ISSUED_AT_CLAIM: &str = "iat";
pub const EXPIRES_AT_CLAIM: &str = "exp";

/// JWT payload: `{email, userID, iat, exp}`.
///
/// Kept as a raw JSON object because numeric claims from other issuers may
/// arrive as floats; accessors do the checked conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new(user_id: i64, email: &str, issued_at: OffsetDateTime, ttl: Duration) -> Self {
        let iat = issued_at.unix_timestamp();
        let exp = iat + ttl.as_secs() as i64;
        let mut map = Map::new();
        map.insert(EMAIL_CLAIM.into(), Value::from(email));
        map.insert(USER_ID_CLAIM.into(), Value::from(user_id));
        map.insert(ISSUED_AT_CLAIM.into(), Value::from(iat));
        map.insert(EXPIRES_AT_CLAIM.into(), Value::from(exp));
        Self(map)
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get(EMAIL_CLAIM).and_then(Value::as_str)
    }

    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.0
            .get(USER_ID_CLAIM)
            .and_then(as_exact_i64)
            .ok_or(TokenError::ClaimMissing(USER_ID_CLAIM))
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.0.get(ISSUED_AT_CLAIM).and_then(as_exact_i64)
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.0.get(EXPIRES_AT_CLAIM).and_then(as_exact_i64)
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// 2^63 as f64; every f64 strictly below it (and >= -2^63) fits in an i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Integer value of a JSON number, accepting floats only when they carry no
/// fractional part and fit in an i64.
fn as_exact_i64(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if !f.is_finite() || f.fract() != 0.0 || f < -I64_BOUND || f >= I64_BOUND {
        return None;
    }
    Some(f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims_with_user_id(user_id: Value) -> Claims {
        let mut map = Map::new();
        map.insert(USER_ID_CLAIM.into(), user_id);
        Claims::from(map)
    }

    #[test]
    fn new_sets_expiry_after_issue_time() {
        let now = OffsetDateTime::now_utc();
        let claims = Claims::new(7, "alice@example.com", now, Duration::from_secs(7200));
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.email(), Some("alice@example.com"));
        assert_eq!(claims.issued_at(), Some(now.unix_timestamp()));
        assert_eq!(claims.expires_at(), Some(now.unix_timestamp() + 7200));
    }

    #[test]
    fn integral_float_user_id_is_accepted() {
        assert_eq!(claims_with_user_id(json!(42.0)).user_id().unwrap(), 42);
        assert_eq!(claims_with_user_id(json!(-3.0)).user_id().unwrap(), -3);
    }

    #[test]
    fn fractional_or_out_of_range_user_id_is_rejected() {
        for value in [json!(42.5), json!(1e19), json!(u64::MAX), json!(-1e19)] {
            let err = claims_with_user_id(value).user_id().unwrap_err();
            assert!(matches!(err, TokenError::ClaimMissing(USER_ID_CLAIM)));
        }
    }

    #[test]
    fn non_numeric_or_absent_user_id_is_missing() {
        let err = claims_with_user_id(json!("42")).user_id().unwrap_err();
        assert!(matches!(err, TokenError::ClaimMissing(_)));

        let err = Claims::from(Map::new()).user_id().unwrap_err();
        assert!(matches!(err, TokenError::ClaimMissing(_)));
    }
}
