use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;

use crate::error::{AccountError, AccountResult};

/// Credential hashing collaborator.
///
/// Produces salted, irreversible representations of passwords and checks
/// plaintext against them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> AccountResult<String>;

    async fn verify(&self, plaintext: &str, hash: &str) -> AccountResult<bool>;
}

/// Argon2id hasher with the crate's default parameters.
///
/// Hashing is CPU-bound, so it runs on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(plaintext: &str) -> AccountResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::PasswordHash(e.to_string()))
}

fn verify_blocking(plaintext: &str, hash: &str) -> AccountResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| AccountError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok())
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> AccountResult<String> {
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || hash_blocking(&plaintext))
            .await
            .map_err(|e| AccountError::Internal(format!("hashing task failed: {}", e)))?
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> AccountResult<bool> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&plaintext, &hash))
            .await
            .map_err(|e| AccountError::Internal(format!("verification task failed: {}", e)))?
    }
}
