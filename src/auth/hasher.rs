//! Password hashing
//!
//! The hashing collaborator used by the scripts, and its bcrypt implementation.

use async_trait::async_trait;
use log::debug;

use crate::error::HashError;

pub const DEFAULT_COST: u32 = 10;

/// One-way password hashing primitive.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Checks `plaintext` against a stored hash.
    ///
    /// Fails with [`HashError::MissingArguments`] when `hash` is absent or empty.
    async fn compare(&self, plaintext: &str, hash: Option<&str>) -> Result<bool, HashError>;

    /// Derives a new hash for `plaintext`.
    async fn hash(&self, plaintext: &str) -> Result<String, HashError>;
}

/// bcrypt-backed hasher. Work runs on tokio's blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn compare(&self, plaintext: &str, hash: Option<&str>) -> Result<bool, HashError> {
        let hash = match hash {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return Err(HashError::MissingArguments),
        };
        let plaintext = plaintext.to_string();

        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
            .await
            .map_err(|e| HashError::Backend(e.to_string()))?;

        match outcome {
            Ok(matched) => Ok(matched),
            // A stored value that is not a bcrypt hash can never match.
            Err(e) => {
                debug!("Stored hash rejected by bcrypt: {}", e);
                Ok(false)
            }
        }
    }

    async fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let plaintext = plaintext.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| HashError::Backend(e.to_string()))?
            .map_err(|e| HashError::Backend(e.to_string()))
    }
}
