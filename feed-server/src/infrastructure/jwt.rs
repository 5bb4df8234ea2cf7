use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),

    #[error("token carries non-positive user_id {0}")]
    InvalidUser(i64),
}

/// Токены выпускает внешний провайдер идентичности с общим секретом.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) user_id: i64,
    pub(crate) exp: i64,
}

pub(crate) struct JwtService {
    secret: String,
}

impl JwtService {
    const LEEWAY_SECONDS: u64 = 10;

    pub(crate) fn new(secret: &str) -> Self {
        JwtService {
            secret: secret.into(),
        }
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = Self::LEEWAY_SECONDS;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        if token_data.claims.user_id <= 0 {
            return Err(JwtError::InvalidUser(token_data.claims.user_id));
        }
        Ok(token_data.claims)
    }

    #[cfg(test)]
    pub(crate) fn generate_token(&self, user_id: i64, ttl_seconds: i64) -> String {
        use chrono::{Duration, Utc};
        use jsonwebtoken::{EncodingKey, Header, encode};

        let claims = Claims {
            user_id,
            exp: (Utc::now() + Duration::seconds(ttl_seconds)).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("test token must encode")
    }
}

#[cfg(test)]
mod tests {
    use super::{JwtError, JwtService};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn verify_accepts_token_signed_with_same_secret() {
        let jwt = JwtService::new(SECRET);
        let token = jwt.generate_token(42, 60);

        let claims = jwt.verify_token(&token).expect("token must verify");
        assert_eq!(claims.user_id, 42);
    }

    #[test]
    fn verify_rejects_foreign_secret() {
        let token = JwtService::new(SECRET).generate_token(42, 60);
        let other = JwtService::new("ffffffffffffffffffffffffffffffff");

        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let jwt = JwtService::new(SECRET);
        let token = jwt.generate_token(42, -3600);

        assert!(jwt.verify_token(&token).is_err());
    }

    #[test]
    fn verify_rejects_non_positive_user_id() {
        let jwt = JwtService::new(SECRET);

        for user_id in [0, -7] {
            let token = jwt.generate_token(user_id, 60);
            let err = jwt.verify_token(&token).expect_err("must reject");
            assert!(matches!(err, JwtError::InvalidUser(id) if id == user_id));
        }
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(JwtService::new(SECRET).verify_token("not.a.jwt").is_err());
    }
}
