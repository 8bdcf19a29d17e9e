//! Authentication primitives
//!
//! Credential inputs, user results and the password hashing collaborator.

pub mod credentials;
pub mod hasher;
pub mod results;

pub use credentials::{Credentials, NewUser};
pub use hasher::{BcryptHasher, PasswordHasher};
pub use results::UserProfile;
