//! Refresh-token lifecycle on top of [`TokenSigner`].
//!
//! One refresh slot per user: the server keeps only a SHA-256 digest of the
//! latest refresh token, so a token is valid exactly while its digest occupies
//! the slot. Rotation swaps the slot with a single compare-and-replace UPDATE,
//! which makes every refresh token single-use without a read-then-write race.
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::{PublicUser, TokenPair};
use crate::security::TokenSigner;

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[derive(Clone)]
pub struct TokenService {
    pool: PgPool,
    signer: TokenSigner,
}

impl TokenService {
    pub fn new(pool: PgPool, signer: TokenSigner) -> Self {
        Self { pool, signer }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Sign a fresh access/refresh pair and occupy the user's refresh slot.
    pub async fn issue_pair(&self, user: &PublicUser) -> Result<TokenPair> {
        let access_token = self.signer.sign_access(user)?;
        let refresh_token = self.signer.sign_refresh(user.id)?;

        user_repo::store_refresh_token(&self.pool, user.id, &digest(&refresh_token)).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a new pair, consuming the old one.
    ///
    /// Fails with an authentication error when the token is expired, malformed,
    /// or no longer matches the stored slot (already rotated or revoked).
    pub async fn rotate(&self, presented: &str) -> Result<(PublicUser, TokenPair)> {
        let claims = self.signer.verify_refresh(presented)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Authentication("invalid refresh token".to_string()))?;

        let user = user_repo::find_public_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::Authentication("invalid refresh token".to_string()))?;

        let access_token = self.signer.sign_access(&user)?;
        let refresh_token = self.signer.sign_refresh(user.id)?;

        let swapped = user_repo::replace_refresh_token(
            &self.pool,
            user.id,
            &digest(presented),
            &digest(&refresh_token),
        )
        .await?;
        if !swapped {
            tracing::warn!(user_id = %user.id, "refresh token reuse detected");
            return Err(AppError::Authentication(
                "refresh token is expired or already used".to_string(),
            ));
        }

        Ok((
            user,
            TokenPair {
                access_token,
                refresh_token,
            },
        ))
    }

    /// Empty the user's refresh slot, invalidating any outstanding refresh token.
    pub async fn revoke(&self, user_id: Uuid) -> Result<()> {
        user_repo::clear_refresh_token(&self.pool, user_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_hex_sha256() {
        let d = digest("some.jwt.token");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_is_deterministic_and_collision_free_for_distinct_tokens() {
        assert_eq!(digest("a"), digest("a"));
        assert_ne!(digest("a"), digest("b"));
    }
}
