//! HS256 JSON Web Tokens carrying the session identity.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenCodec, TokenCodecError};
use crate::domain::{DisplayName, Identity, Role, SessionToken, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// [`TokenCodec`] backed by `jsonwebtoken` with a shared HMAC secret.
///
/// Expiry is compared against the caller's `now` instead of the system
/// clock, so the library's own `exp` check is disabled.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    /// Create a codec signing with `secret`.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

fn identity_from(claims: Claims) -> Result<Identity, TokenCodecError> {
    let user_id = UserId::new(&claims.sub).map_err(|err| TokenCodecError::invalid(err.to_string()))?;
    let display_name =
        DisplayName::new(&claims.name).map_err(|err| TokenCodecError::invalid(err.to_string()))?;
    Ok(Identity {
        user_id,
        display_name,
        role: claims.role,
    })
}

impl TokenCodec for JwtTokenCodec {
    fn issue(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionToken, TokenCodecError> {
        let claims = Claims {
            sub: identity.user_id.to_string(),
            name: identity.display_name.as_ref().to_owned(),
            role: identity.role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(SessionToken::new)
            .map_err(|err| TokenCodecError::encoding(err.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenCodecError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| TokenCodecError::invalid(err.to_string()))?;
        if now.timestamp() >= data.claims.exp {
            return Err(TokenCodecError::Expired);
        }
        identity_from(data.claims)
    }
}
