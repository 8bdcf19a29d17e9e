//! Authentication result types
//!
//! Defines result structures returned by the scripts.

use serde::Serialize;

/// Normalized user returned by `login` and `get_user`. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub nickname: String,
}
