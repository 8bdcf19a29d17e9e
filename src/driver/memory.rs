//! In-memory driver
//!
//! Keeps the `Users` table in process and answers the fixed script
//! statements. Any other statement is rejected. Seeded from a TOML file
//! of `[[users]]` tables for local runs, and written back with `save`.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use config::{Config, File};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{Connection, ConnectionOptions, Driver, QueryResult, Row};
use crate::error::DriverError;
use crate::scripts::queries;

/// One row of the in-memory `Users` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredUser {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email_verified: bool,
}

#[derive(Debug, Deserialize, Serialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<StoredUser>,
}

type SharedUsers = Arc<RwLock<Vec<StoredUser>>>;

/// Driver backed by a process-local user table.
#[derive(Debug, Clone)]
pub struct MemoryDriver {
    users: SharedUsers,
    next_id: Arc<AtomicU64>,
    required_login: Option<(String, String)>,
}

impl MemoryDriver {
    pub fn new(users: Vec<StoredUser>) -> Self {
        let highest = users
            .iter()
            .filter_map(|u| u.id.strip_prefix("uid")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next_id = highest.max(users.len() as u64) + 1;
        Self {
            users: Arc::new(RwLock::new(users)),
            next_id: Arc::new(AtomicU64::new(next_id)),
            required_login: None,
        }
    }

    /// Loads the user table from a TOML (or any `config`-supported) file.
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        let file: UsersFile = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        info!(
            "Loaded {} user(s) from {}",
            file.users.len(),
            path.display()
        );
        Ok(Self::new(file.users))
    }

    /// Writes the current table back as a `[[users]]` TOML file.
    pub async fn save(&self, path: &Path) -> io::Result<()> {
        let file = UsersFile {
            users: self.users().await,
        };
        let contents = toml::to_string(&file).map_err(io::Error::other)?;
        tokio::fs::write(path, contents).await?;

        info!("Saved {} user(s) to {}", file.users.len(), path.display());
        Ok(())
    }

    /// Rejects connections whose user/password differ from the given pair.
    pub fn require_login(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.required_login = Some((user.into(), password.into()));
        self
    }

    /// Snapshot of the current table contents.
    pub async fn users(&self) -> Vec<StoredUser> {
        self.users.read().await.clone()
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn get_connection(
        &self,
        options: &ConnectionOptions,
    ) -> Result<Box<dyn Connection>, DriverError> {
        if let Some((user, password)) = &self.required_login {
            if &options.user != user || &options.password != password {
                return Err(DriverError::new("invalid username/password; logon denied"));
            }
        }

        debug!("Opened in-memory connection for {}", options.user);
        Ok(Box::new(MemoryConnection {
            users: Arc::clone(&self.users),
            next_id: Arc::clone(&self.next_id),
        }))
    }
}

struct MemoryConnection {
    users: SharedUsers,
    next_id: Arc<AtomicU64>,
}

fn bound<'a>(params: &[&'a str], index: usize) -> Result<&'a str, DriverError> {
    params
        .get(index)
        .copied()
        .ok_or_else(|| DriverError::new(format!("missing bind parameter at position {}", index + 1)))
}

fn to_row(user: &StoredUser, with_password: bool) -> Row {
    let mut row = Row::new()
        .with("ID", user.id.as_str())
        .with("EMAIL", user.email.as_str())
        .with("NICKNAME", user.nickname.as_str());
    if with_password {
        if let Some(hash) = &user.password {
            row = row.with("PASSWORD", hash.as_str());
        }
    }
    row
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn execute(&mut self, query: &str, params: &[&str]) -> Result<QueryResult, DriverError> {
        match query {
            queries::LOGIN | queries::GET_USER => {
                let email = bound(params, 0)?;
                let with_password = query == queries::LOGIN;
                let users = self.users.read().await;
                let rows = users
                    .iter()
                    .filter(|u| u.email == email)
                    .map(|u| to_row(u, with_password))
                    .collect();
                Ok(QueryResult::with_rows(rows))
            }
            queries::CREATE => {
                let email = bound(params, 0)?;
                let password = bound(params, 1)?;
                let email_verified = bound(params, 2)?;
                let nickname = bound(params, 3)?;

                let mut users = self.users.write().await;
                if users.iter().any(|u| u.email == email) {
                    return Err(DriverError::new("unique constraint (USERS.EMAIL) violated"));
                }
                let id = loop {
                    let candidate = format!("uid{}", self.next_id.fetch_add(1, Ordering::SeqCst));
                    if users.iter().all(|u| u.id != candidate) {
                        break candidate;
                    }
                };
                users.push(StoredUser {
                    id,
                    email: email.to_string(),
                    password: Some(password.to_string()),
                    nickname: nickname.to_string(),
                    email_verified: email_verified == "true",
                });
                Ok(QueryResult::affected(1))
            }
            queries::VERIFY => {
                let email_verified = bound(params, 0)? == "true";
                let email = bound(params, 1)?;
                let mut users = self.users.write().await;
                let mut affected = 0;
                for user in users.iter_mut().filter(|u| u.email == email) {
                    user.email_verified = email_verified;
                    affected += 1;
                }
                Ok(QueryResult::affected(affected))
            }
            queries::CHANGE_PASSWORD => {
                let hash = bound(params, 0)?;
                let email = bound(params, 1)?;
                let mut users = self.users.write().await;
                let mut affected = 0;
                for user in users.iter_mut().filter(|u| u.email == email) {
                    user.password = Some(hash.to_string());
                    affected += 1;
                }
                Ok(QueryResult::affected(affected))
            }
            queries::DELETE => {
                let id = bound(params, 0)?;
                let mut users = self.users.write().await;
                let before = users.len();
                users.retain(|u| u.id != id);
                Ok(QueryResult::affected((before - users.len()) as u64))
            }
            other => Err(DriverError::new(format!("unsupported statement: {}", other))),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        debug!("Closed in-memory connection");
        Ok(())
    }
}
