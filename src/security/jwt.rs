/// JWT issuance and verification using HS256.
///
/// Access and refresh tokens are signed with distinct symmetric secrets so a
/// token of one class never verifies as the other. Access tokens carry the
/// denormalized profile fields handlers need; refresh tokens carry only the
/// identity.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use crate::models::PublicUser;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Unique token id; makes every issued refresh token distinct.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

#[derive(Clone)]
pub struct TokenSigner {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl TokenSigner {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    pub fn sign_access(&self, user: &PublicUser) -> Result<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_ttl)).timestamp(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
        };
        Ok(encode(&Header::default(), &claims, &self.access_encoding)?)
    }

    pub fn sign_refresh(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.refresh_ttl)).timestamp(),
            token_type: TOKEN_TYPE_REFRESH.to_string(),
        };
        Ok(encode(&Header::default(), &claims, &self.refresh_encoding)?)
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &Validation::default())
            .map_err(|_| AppError::Authentication("invalid access token".to_string()))?;
        if data.claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(AppError::Authentication(
                "invalid access token".to_string(),
            ));
        }
        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &Validation::default())
            .map_err(|_| AppError::Authentication("invalid refresh token".to_string()))?;
        if data.claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(AppError::Authentication(
                "invalid refresh token".to_string(),
            ));
        }
        Ok(data.claims)
    }
}
