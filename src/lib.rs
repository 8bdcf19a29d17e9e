pub mod auth;
pub mod config;
pub mod driver;
pub mod error;
pub mod scripts;
pub mod utils;

pub use auth::{BcryptHasher, Credentials, NewUser, PasswordHasher, UserProfile};
pub use config::{ScriptsConfig, StoreType};
pub use driver::{Connection, ConnectionOptions, Driver, MemoryDriver, QueryResult, Row};
pub use error::{DriverError, ErrorKind, HashError, ScriptError};
pub use scripts::{BareDatabase, CustomDatabase, RelationalDatabase, ScriptKind, build_database};
