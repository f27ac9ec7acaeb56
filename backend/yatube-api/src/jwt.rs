/// Bearer token validation
///
/// Tokens are issued by the auth subsystem. This service only checks the
/// signature and expiry and reads the user id (`sub`) and `username`.
use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Claims carried by access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Username at issue time
    #[serde(default)]
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    /// HS256 with a shared secret.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// RS256 with the issuer's public key.
    pub fn from_rsa_pem(public_key_pem: &str) -> Result<Self> {
        let key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;
        Ok(Self {
            key,
            validation: Validation::new(Algorithm::RS256),
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        match (&config.jwt_public_key_pem, &config.jwt_secret) {
            (Some(pem), _) => Self::from_rsa_pem(pem),
            (None, Some(secret)) => Ok(Self::from_secret(secret)),
            (None, None) => Err(anyhow!("No JWT key configured")),
        }
    }

    pub fn validate(&self, token: &str) -> std::result::Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.key, &self.validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, exp: i64) -> String {
        let claims = Claims {
            sub: "42".into(),
            username: "leo".into(),
            exp,
            iat: 0,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn accepts_token_signed_with_the_secret() {
        let validator = JwtValidator::from_secret("s3cret");
        let claims = validator.validate(&token("s3cret", in_one_hour())).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.username, "leo");
    }

    #[test]
    fn rejects_wrong_signature_and_expired_tokens() {
        let validator = JwtValidator::from_secret("s3cret");
        assert!(validator.validate(&token("other", in_one_hour())).is_err());
        assert!(validator.validate(&token("s3cret", 1_000)).is_err());
        assert!(validator.validate("not-a-token").is_err());
    }

    #[test]
    fn config_without_keys_is_an_error() {
        assert!(JwtValidator::from_config(&AuthConfig::default()).is_err());
    }
}
