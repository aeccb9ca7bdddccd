use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{ApiError, Result},
};

/// Claims carried by an admin access token. Issuance lives outside this
/// service's scope; only validation is exercised by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Admin id.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_minutes: u64,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiration_minutes: config.access_token_expiration_minutes,
        }
    }

    pub fn generate_token(&self, admin_id: Uuid) -> Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: admin_id.to_string(),
            iat: now.unix_timestamp(),
            exp: (now + Duration::minutes(self.expiration_minutes as i64)).unix_timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to sign token: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid access token: {}", e)))
    }

    pub fn admin_id_from_claims(claims: &Claims) -> Result<Uuid> {
        Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Token subject is not a valid id".to_string()))
    }
}
