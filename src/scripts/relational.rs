//! Relational store
//!
//! Scripts for a `Users` table reached through a vendor [`Driver`]. Each
//! script opens one connection, runs its statement with bound parameters
//! and releases the connection exactly once on every exit path.

use async_trait::async_trait;
use log::{debug, info, warn};

use super::{CustomDatabase, queries};
use crate::auth::{NewUser, PasswordHasher, UserProfile};
use crate::driver::{Connection, ConnectionOptions, Driver, QueryResult, Row};
use crate::error::ScriptError;

/// Scripts for a relational user table.
pub struct RelationalDatabase<D, H> {
    driver: D,
    hasher: H,
    options: ConnectionOptions,
}

impl<D: Driver, H: PasswordHasher> RelationalDatabase<D, H> {
    pub fn new(driver: D, hasher: H, options: ConnectionOptions) -> Self {
        Self {
            driver,
            hasher,
            options,
        }
    }

    #[cfg(test)]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    async fn connect(&self) -> Result<Box<dyn Connection>, ScriptError> {
        self.driver
            .get_connection(&self.options)
            .await
            .map_err(|e| {
                warn!("Failed to connect to {}: {}", self.options.connect_string, e);
                ScriptError::Connection(e)
            })
    }

    async fn verify_on(
        &self,
        connection: &mut dyn Connection,
        identifier: &str,
        secret: &str,
    ) -> Result<UserProfile, ScriptError> {
        let result = run(connection, queries::LOGIN, &[identifier]).await?;

        let Some(row) = result.rows.first() else {
            warn!("Login failed: no user {}", identifier);
            return Err(ScriptError::NotFound(identifier.to_string()));
        };

        let matched = self.hasher.compare(secret, row.get("PASSWORD")).await?;
        if !matched {
            warn!("Login failed: wrong password for {}", identifier);
            return Err(ScriptError::InvalidSecret(identifier.to_string()));
        }

        // email is the submitted identifier, not the stored column.
        Ok(UserProfile {
            user_id: column(row, "ID"),
            email: identifier.to_string(),
            nickname: column(row, "NICKNAME"),
        })
    }
}

/// Runs one statement, mapping a driver failure to [`ScriptError::Query`].
async fn run(
    connection: &mut dyn Connection,
    query: &str,
    params: &[&str],
) -> Result<QueryResult, ScriptError> {
    debug!("Executing: {}", query);
    connection
        .execute(query, params)
        .await
        .map_err(ScriptError::Query)
}

/// Releases the connection. A failing close never replaces the outcome.
async fn release(connection: Box<dyn Connection>) {
    if let Err(e) = connection.close().await {
        warn!("Failed to close connection: {}", e);
    }
}

fn column(row: &Row, name: &str) -> String {
    row.get(name).unwrap_or_default().to_string()
}

#[async_trait]
impl<D: Driver, H: PasswordHasher> CustomDatabase for RelationalDatabase<D, H> {
    async fn login(&self, identifier: &str, secret: &str) -> Result<UserProfile, ScriptError> {
        let mut connection = self.connect().await?;
        let outcome = self.verify_on(connection.as_mut(), identifier, secret).await;
        release(connection).await;

        if let Ok(user) = &outcome {
            info!("User {} logged in", user.user_id);
        }
        outcome
    }

    async fn create(&self, user: &NewUser) -> Result<(), ScriptError> {
        let hash = self.hasher.hash(&user.password).await?;

        let mut connection = self.connect().await?;
        let outcome = run(
            connection.as_mut(),
            queries::CREATE,
            &[user.email.as_str(), hash.as_str(), "false", user.nickname.as_str()],
        )
        .await;
        release(connection).await;

        outcome?;
        info!("Created user {}", user.email);
        Ok(())
    }

    async fn verify(&self, email: &str) -> Result<bool, ScriptError> {
        let mut connection = self.connect().await?;
        let outcome = run(connection.as_mut(), queries::VERIFY, &["true", email]).await;
        release(connection).await;

        let verified = outcome?.rows_affected > 0;
        info!("Verify {}: {}", email, verified);
        Ok(verified)
    }

    async fn change_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<bool, ScriptError> {
        let hash = self.hasher.hash(new_password).await?;

        let mut connection = self.connect().await?;
        let outcome = run(
            connection.as_mut(),
            queries::CHANGE_PASSWORD,
            &[hash.as_str(), email],
        )
        .await;
        release(connection).await;

        let changed = outcome?.rows_affected > 0;
        info!("Change password for {}: {}", email, changed);
        Ok(changed)
    }

    async fn get_user(&self, email: &str) -> Result<Option<UserProfile>, ScriptError> {
        let mut connection = self.connect().await?;
        let outcome = run(connection.as_mut(), queries::GET_USER, &[email]).await;
        release(connection).await;

        let result = outcome?;
        Ok(result.rows.first().map(|row| UserProfile {
            user_id: column(row, "ID"),
            email: row.get("EMAIL").unwrap_or(email).to_string(),
            nickname: column(row, "NICKNAME"),
        }))
    }

    async fn delete(&self, id: &str) -> Result<(), ScriptError> {
        let mut connection = self.connect().await?;
        let outcome = run(connection.as_mut(), queries::DELETE, &[id]).await;
        release(connection).await;

        outcome?;
        info!("Deleted user {}", id);
        Ok(())
    }
}
