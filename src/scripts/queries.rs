//! Fixed statements issued by the relational scripts
//!
//! Every value is passed as a bound parameter, in the order of the
//! placeholders.

/// Binds `:email`.
pub const LOGIN: &str = "select ID, EMAIL, PASSWORD, NICKNAME from Users where EMAIL = :email";

/// Binds `:email`.
pub const GET_USER: &str = "select ID, EMAIL, NICKNAME from Users where EMAIL = :email";

/// Binds `:email`, `:password`, `:email_verified`, `:nickname`.
pub const CREATE: &str = "insert into Users (EMAIL, PASSWORD, EMAIL_VERIFIED, NICKNAME) values (:email, :password, :email_verified, :nickname)";

/// Binds `:email_verified`, `:email`.
pub const VERIFY: &str = "update Users set EMAIL_VERIFIED = :email_verified where EMAIL = :email";

/// Binds `:hash`, `:email`.
pub const CHANGE_PASSWORD: &str = "update Users set PASSWORD = :hash where EMAIL = :email";

/// Binds `:id`.
pub const DELETE: &str = "delete from Users where ID = :id";
