//! HS256 JSON Web Tokens carrying `sub` (username) and `exp` (unix seconds).

use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("token lifetime must be positive, got {0}")]
    InvalidTtl(Duration),
    #[error("token expiry is out of range")]
    ExpiryOverflow,
    #[error("token encoding failed: {0}")]
    Encode(jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Signing key plus the fixed lifetime of every issued token.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if !ttl.is_positive() {
            return Err(TokenError::InvalidTtl(ttl));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// A key that only lives as long as this process.
    pub fn random(ttl: Duration) -> Result<Self, TokenError> {
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::new(&secret, ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(username, self.ttl)
    }

    pub fn issue_with_ttl(&self, username: &str, ttl: Duration) -> Result<String, TokenError> {
        let expires_at = OffsetDateTime::now_utc()
            .checked_add(ttl)
            .ok_or(TokenError::ExpiryOverflow)?;
        let claims = Claims {
            sub: username.to_owned(),
            exp: expires_at.unix_timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Encode)
    }

    /// Returns the username the token was issued for.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(b"test-secret", Duration::minutes(30)).unwrap()
    }

    #[test]
    fn issued_token_verifies_to_its_subject() {
        let keys = keys();
        let token = keys.issue("alice").unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(keys.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn claims_carry_subject_and_expiry() {
        let keys = keys();
        let token = keys.issue("alice").unwrap();

        let claims = jsonwebtoken::decode::<Claims>(&token, &keys.decoding, &keys.validation)
            .unwrap()
            .claims;
        let expected = (OffsetDateTime::now_utc() + Duration::minutes(30)).unix_timestamp();

        assert_eq!(claims.sub, "alice");
        assert!((claims.exp - expected).abs() <= 2);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let token = keys.issue_with_ttl("alice", Duration::seconds(-5)).unwrap();

        assert!(matches!(keys.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn lifetime_past_the_calendar_is_an_error() {
        let keys = keys();

        let issued = keys.issue_with_ttl("alice", Duration::MAX);
        assert!(matches!(issued, Err(TokenError::ExpiryOverflow)));
    }

    #[test]
    fn non_positive_lifetime_is_refused() {
        for ttl in [Duration::ZERO, Duration::minutes(-5)] {
            let keys = TokenKeys::new(b"test-secret", ttl);
            assert!(matches!(keys, Err(TokenError::InvalidTtl(_))));
        }
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let other = TokenKeys::new(b"other-secret", Duration::minutes(30)).unwrap();
        let token = other.issue("alice").unwrap();

        assert!(matches!(keys().verify(&token), Err(TokenError::BadSignature)));
    }

    #[test]
    fn tampered_subject_is_rejected() {
        let keys = keys();
        let token = keys.issue("alice").unwrap();
        let forged = TokenKeys::new(b"other-secret", Duration::minutes(30))
            .unwrap()
            .issue("mallory")
            .unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        let spliced = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(matches!(keys.verify(&spliced), Err(TokenError::BadSignature)));
    }

    #[test]
    fn unsigned_algorithm_is_rejected() {
        // {"alg":"none","typ":"JWT"} . {"sub":"alice","exp":99999999999}
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJzdWIiOiJhbGljZSIsImV4cCI6OTk5OTk5OTk5OTl9.";

        assert!(matches!(keys().verify(token), Err(TokenError::Malformed)));
    }

    #[test]
    fn garbage_is_malformed() {
        let keys = keys();
        for token in ["", "abc", "a.b", "a.b.c.d", "!!!.???.***"] {
            assert!(matches!(keys.verify(token), Err(TokenError::Malformed)), "{token}");
        }
    }

    #[test]
    fn random_keys_do_not_share_tokens() {
        let a = TokenKeys::random(Duration::minutes(5)).unwrap();
        let b = TokenKeys::random(Duration::minutes(5)).unwrap();
        let token = a.issue("alice").unwrap();

        assert_eq!(a.verify(&token).unwrap(), "alice");
        assert!(b.verify(&token).is_err());
    }
}
