use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::Session;
use crate::config::AuthConfig;
use crate::talent::domain::{Role, UserId};
use crate::talent::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: UserId,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and checks HS256 session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, Duration::minutes(config.token_ttl_minutes))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: UserId, role: Role) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Any decoding failure, including expiry, reads as an invalid token.
    pub fn verify(&self, token: &str) -> Result<Session, ServiceError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|_| ServiceError::InvalidToken)?;
        Ok(Session {
            user_id: data.claims.user_id,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_the_session() {
        let issuer = TokenIssuer::new("unit-secret", Duration::minutes(60));
        let token = issuer.issue(42, Role::Recruiter).expect("token");
        let session = issuer.verify(&token).expect("valid");
        assert_eq!(session.user_id, 42);
        assert_eq!(session.role, Role::Recruiter);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let issuer = TokenIssuer::new("unit-secret", Duration::minutes(60));
        let forger = TokenIssuer::new("other-secret", Duration::minutes(60));
        let token = forger.issue(1, Role::Sysadmin).expect("token");
        assert!(matches!(issuer.verify(&token), Err(ServiceError::InvalidToken)));
    }

    #[test]
    fn rejects_expired_tokens() {
        let issuer = TokenIssuer::new("unit-secret", Duration::hours(-2));
        let token = issuer.issue(1, Role::Recruit).expect("token");
        assert!(matches!(issuer.verify(&token), Err(ServiceError::InvalidToken)));
    }

    #[test]
    fn rejects_garbage() {
        let issuer = TokenIssuer::new("unit-secret", Duration::minutes(5));
        assert!(matches!(issuer.verify("abc.def"), Err(ServiceError::InvalidToken)));
    }
}
