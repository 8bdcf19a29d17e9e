//! Custom database scripts
//!
//! Every store type exposes the same six scripts through [`CustomDatabase`].
//! Callers get a uniform error surface whether the store failed or simply
//! does not support an operation.

pub mod bare;
pub mod queries;
pub mod relational;

use std::fmt;

use async_trait::async_trait;

use crate::auth::{BcryptHasher, Credentials, NewUser, UserProfile};
use crate::config::{ScriptsConfig, StoreType};
use crate::driver::Driver;
use crate::error::ScriptError;

pub use bare::BareDatabase;
pub use relational::RelationalDatabase;

/// The scripts a custom database connection can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Login,
    Create,
    Verify,
    ChangePassword,
    GetUser,
    Delete,
}

impl ScriptKind {
    pub const ALL: [ScriptKind; 6] = [
        ScriptKind::Login,
        ScriptKind::Create,
        ScriptKind::Verify,
        ScriptKind::ChangePassword,
        ScriptKind::GetUser,
        ScriptKind::Delete,
    ];
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptKind::Login => "Login",
            ScriptKind::Create => "Create",
            ScriptKind::Verify => "Verify",
            ScriptKind::ChangePassword => "Change Password",
            ScriptKind::GetUser => "Get User",
            ScriptKind::Delete => "Delete",
        };
        f.write_str(name)
    }
}

/// A user store reachable through the custom database scripts.
#[async_trait]
pub trait CustomDatabase: Send + Sync {
    /// Verifies `secret` for `identifier` and returns the normalized user.
    async fn login(&self, identifier: &str, secret: &str) -> Result<UserProfile, ScriptError>;

    async fn create(&self, user: &NewUser) -> Result<(), ScriptError>;

    /// Marks the e-mail as verified. `false` when no user matched.
    async fn verify(&self, email: &str) -> Result<bool, ScriptError>;

    /// `false` when no user matched.
    async fn change_password(&self, email: &str, new_password: &str)
    -> Result<bool, ScriptError>;

    async fn get_user(&self, email: &str) -> Result<Option<UserProfile>, ScriptError>;

    async fn delete(&self, id: &str) -> Result<(), ScriptError>;

    async fn authenticate(&self, credentials: &Credentials) -> Result<UserProfile, ScriptError> {
        self.login(&credentials.identifier, &credentials.secret)
            .await
    }
}

/// Builds the scripts for the configured store type.
pub fn build_database<D>(config: &ScriptsConfig, driver: D) -> Box<dyn CustomDatabase>
where
    D: Driver + 'static,
{
    match config.store {
        StoreType::Bare => Box::new(BareDatabase),
        StoreType::Relational => Box::new(RelationalDatabase::new(
            driver,
            BcryptHasher::new(config.bcrypt_cost),
            config.connection_options(),
        )),
    }
}
