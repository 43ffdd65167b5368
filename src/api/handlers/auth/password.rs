//! Password hashing policy: bcrypt at a fixed cost, on the blocking pool.

use anyhow::{anyhow, Context, Result};
use tokio::task;

/// Work factor for new password hashes.
pub(super) const BCRYPT_COST: u32 = 12;

/// Hash a password for storage.
///
/// bcrypt is CPU-bound, so the work runs on the blocking thread pool and
/// other sessions' requests keep flowing while it grinds.
pub(super) async fn hash_password(password: String) -> Result<String> {
    task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|err| anyhow!("hashing task failed: {err}"))?
        .context("bcrypt hashing failed")
}

/// Verify a password against a stored hash.
///
/// Only ever compare through here; a stored hash is never checked with
/// plain equality.
pub(super) async fn verify_password(password: String, hash: String) -> Result<bool> {
    task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| anyhow!("verification task failed: {err}"))?
        .context("bcrypt verification failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify_round_trips() -> Result<()> {
        // Lower cost to keep the test fast; the hash format is the same.
        let hash = task::spawn_blocking(|| bcrypt::hash("secret1", 4))
            .await
            .map_err(|err| anyhow!("hashing task failed: {err}"))??;

        assert!(verify_password("secret1".to_string(), hash.clone()).await?);
        assert!(!verify_password("wrong".to_string(), hash).await?);
        Ok(())
    }

    #[tokio::test]
    async fn verify_rejects_garbage_hash() {
        let result = verify_password("secret1".to_string(), "not-a-hash".to_string()).await;
        assert!(result.is_err());
    }
}
