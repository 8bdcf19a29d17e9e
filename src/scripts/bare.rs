//! Bare store
//!
//! Placeholder for a connection whose scripts were never written. Every
//! script fails with a configuration error and performs no I/O.

use async_trait::async_trait;
use log::error;

use super::{CustomDatabase, ScriptKind};
use crate::auth::{NewUser, UserProfile};
use crate::error::ScriptError;

pub const MANAGEMENT_CONSOLE_URL: &str = "https://manage.auth0.com/#/connections/database";

/// Store type with no native support for any script.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareDatabase;

fn not_implemented(kind: ScriptKind) -> ScriptError {
    error!("{} script called on a bare database connection", kind);
    ScriptError::Configuration(format!(
        "Please implement the {} script for this database connection at {}",
        kind, MANAGEMENT_CONSOLE_URL
    ))
}

#[async_trait]
impl CustomDatabase for BareDatabase {
    async fn login(&self, _identifier: &str, _secret: &str) -> Result<UserProfile, ScriptError> {
        Err(not_implemented(ScriptKind::Login))
    }

    async fn create(&self, _user: &NewUser) -> Result<(), ScriptError> {
        Err(not_implemented(ScriptKind::Create))
    }

    async fn verify(&self, _email: &str) -> Result<bool, ScriptError> {
        Err(not_implemented(ScriptKind::Verify))
    }

    async fn change_password(
        &self,
        _email: &str,
        _new_password: &str,
    ) -> Result<bool, ScriptError> {
        Err(not_implemented(ScriptKind::ChangePassword))
    }

    async fn get_user(&self, _email: &str) -> Result<Option<UserProfile>, ScriptError> {
        Err(not_implemented(ScriptKind::GetUser))
    }

    async fn delete(&self, _id: &str) -> Result<(), ScriptError> {
        Err(not_implemented(ScriptKind::Delete))
    }
}
