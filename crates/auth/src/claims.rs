use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hemolink_core::UserId;

use crate::Role;

/// JWT claims model.
///
/// This is the minimal set of claims the backend expects; issuance happens in
/// an external identity service and is out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / user identifier.
    pub sub: UserId,

    /// RBAC role granted to the subject.
    pub role: Role,

    /// Display name of the subject.
    pub name: String,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token is malformed or has a bad signature")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims against a supplied clock.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// is the validator's job.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

/// Token validation contract used by the HTTP auth middleware.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>)
    -> Result<JwtClaims, TokenValidationError>;
}

/// HS256 validator over a shared secret.
pub struct Hs256JwtValidator {
    decoding_key: jsonwebtoken::DecodingKey,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            decoding_key: jsonwebtoken::DecodingKey::from_secret(&secret),
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<JwtClaims, TokenValidationError> {
        // Time-window checks are done on the claims below, against the
        // caller-supplied clock, so they stay deterministic in tests.
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenValidationError::Malformed)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            sub: UserId::new(),
            role: Role::Donor,
            name: "test donor".to_string(),
            issued_at,
            expires_at,
        }
    }

    fn encode(claims: &JwtClaims, secret: &str) -> String {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            claims,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_token_inside_time_window() {
        let now = Utc::now();
        let claims = claims(now - Duration::minutes(1), now + Duration::minutes(10));
        let token = encode(&claims, "secret");

        let validator = Hs256JwtValidator::new(b"secret".to_vec());
        let decoded = validator.validate(&token, now).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now();
        let claims = claims(now - Duration::minutes(20), now - Duration::minutes(10));
        let token = encode(&claims, "secret");

        let validator = Hs256JwtValidator::new(b"secret".to_vec());
        let err = validator.validate(&token, now).unwrap_err();
        assert_eq!(err, TokenValidationError::Expired);
    }

    #[test]
    fn rejects_wrong_secret() {
        let now = Utc::now();
        let claims = claims(now - Duration::minutes(1), now + Duration::minutes(10));
        let token = encode(&claims, "secret-a");

        let validator = Hs256JwtValidator::new(b"secret-b".to_vec());
        let err = validator.validate(&token, now).unwrap_err();
        assert_eq!(err, TokenValidationError::Malformed);
    }

    #[test]
    fn rejects_inverted_time_window() {
        let now = Utc::now();
        let claims = claims(now + Duration::minutes(10), now - Duration::minutes(10));
        assert_eq!(
            validate_claims(&claims, now).unwrap_err(),
            TokenValidationError::InvalidTimeWindow
        );
    }
}
