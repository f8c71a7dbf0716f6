//! The bearer-token session owned by the client.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Token lifetime the API documents when the JWT carries no readable expiry:
/// two hours.
pub(crate) const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 7200;

/// An authenticated session: the bearer token plus its expiry.
///
/// The client holds at most one session behind a reader/writer lock. Every
/// successful login replaces the session wholesale; it is never partially
/// updated.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Builds a session from a raw JWT, deriving the expiry from its `exp`
    /// claim when readable and falling back to the documented default
    /// lifetime otherwise.
    pub fn from_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let expires_at = token_expiry(&token)
            .unwrap_or_else(|_| Utc::now() + Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS));
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Builds a session with an explicitly known expiry.
    pub fn with_expiry(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Whether this session can still authenticate a request at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && self.expires_at.is_none_or(|expiry| now < expiry)
    }
}

/// Failure to read the expiry claim out of a JWT.
#[derive(Debug, thiserror::Error)]
pub enum TokenExpiryError {
    #[error("invalid JWT format: expected three dot-separated parts")]
    Format,
    #[error("invalid JWT payload encoding")]
    Payload(#[source] base64::DecodeError),
    #[error("invalid JWT claims")]
    Claims(#[source] serde_json::Error),
}

#[derive(Deserialize)]
struct TokenClaims {
    exp: i64,
}

/// Decodes the `exp` claim from a JWT-style token without verifying the
/// signature. The API's tokens are consumed, not validated, on this side.
pub fn token_expiry(token: &str) -> Result<DateTime<Utc>, TokenExpiryError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(TokenExpiryError::Format),
    };
    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(TokenExpiryError::Payload)?;
    let claims: TokenClaims =
        serde_json::from_slice(&decoded).map_err(TokenExpiryError::Claims)?;
    Ok(DateTime::from_timestamp(claims.exp, 0).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_exp(exp: i64) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!("{{\"exp\":{exp}}}"));
        format!("header.{payload}.signature")
    }

    #[test]
    fn reads_expiry_claim() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let expiry = token_expiry(&jwt_with_exp(exp)).unwrap();
        assert_eq!(expiry.timestamp(), exp);
    }

    #[test]
    fn rejects_two_part_token() {
        assert!(matches!(
            token_expiry("invalid.token"),
            Err(TokenExpiryError::Format)
        ));
    }

    #[test]
    fn rejects_bad_payload_encoding() {
        assert!(matches!(
            token_expiry("header.!!!.signature"),
            Err(TokenExpiryError::Payload(_))
        ));
    }

    #[test]
    fn rejects_non_json_claims() {
        let payload = URL_SAFE_NO_PAD.encode("not json");
        let token = format!("header.{payload}.signature");
        assert!(matches!(
            token_expiry(&token),
            Err(TokenExpiryError::Claims(_))
        ));
    }

    #[test]
    fn session_from_unreadable_token_gets_default_lifetime() {
        let before = Utc::now();
        let session = Session::from_token("opaque-token");
        let expiry = session.expires_at.unwrap();
        assert!(expiry >= before + Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS));
        assert!(expiry <= Utc::now() + Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS));
    }

    #[test]
    fn validity_honors_token_and_expiry() {
        let now = Utc::now();
        let live = Session::with_expiry("tok", now + Duration::hours(1));
        assert!(live.is_valid_at(now));

        let expired = Session::with_expiry("tok", now - Duration::seconds(1));
        assert!(!expired.is_valid_at(now));

        let empty = Session {
            token: String::new(),
            expires_at: None,
        };
        assert!(!empty.is_valid_at(now));

        let no_expiry = Session {
            token: "tok".into(),
            expires_at: None,
        };
        assert!(no_expiry.is_valid_at(now));
    }
}
