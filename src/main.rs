//! custom-db - Entry Point
//!
//! Runs a single custom database script against the configured store and
//! prints the result as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};
use serde_json::{Value, json};

use custom_db_scripts::error::handlers::{exit_code, handle_error};
use custom_db_scripts::utils::logging::setup_logging;
use custom_db_scripts::{
    Credentials, CustomDatabase, MemoryDriver, NewUser, ScriptError, ScriptsConfig, StoreType,
    build_database,
};

#[derive(Parser, Debug)]
#[command(name = "custom-db")]
#[command(about = "Run custom database scripts against a user store")]
#[command(author, version, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    script: Script,
}

#[derive(Subcommand, Debug)]
enum Script {
    /// Verify a password and print the user
    Login { email: String, password: String },
    /// Provision a new user
    Create {
        email: String,
        password: String,
        #[arg(long)]
        nickname: Option<String>,
    },
    /// Mark an e-mail address as verified
    Verify { email: String },
    /// Replace a user's password
    ChangePassword { email: String, new_password: String },
    /// Look a user up by e-mail
    GetUser { email: String },
    /// Remove a user by id
    Delete { id: String },
}

impl Script {
    /// Scripts that change the user table.
    fn writes(&self) -> bool {
        matches!(
            self,
            Script::Create { .. }
                | Script::Verify { .. }
                | Script::ChangePassword { .. }
                | Script::Delete { .. }
        )
    }
}

async fn run(db: &dyn CustomDatabase, script: Script) -> Result<Value, ScriptError> {
    let value = match script {
        Script::Login { email, password } => {
            let user = db.authenticate(&Credentials::new(email, password)).await?;
            json!(user)
        }
        Script::Create {
            email,
            password,
            nickname,
        } => {
            let mut user = NewUser::new(email, password);
            if let Some(nickname) = nickname {
                user = user.with_nickname(nickname);
            }
            db.create(&user).await?;
            json!({ "created": user.email })
        }
        Script::Verify { email } => {
            let verified = db.verify(&email).await?;
            json!({ "verified": verified })
        }
        Script::ChangePassword {
            email,
            new_password,
        } => {
            let changed = db.change_password(&email, &new_password).await?;
            json!({ "changed": changed })
        }
        Script::GetUser { email } => {
            let user = db.get_user(&email).await?;
            json!(user)
        }
        Script::Delete { id } => {
            db.delete(&id).await?;
            json!({ "deleted": id })
        }
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match ScriptsConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("configuration error: {}", e);
            return ExitCode::from(78);
        }
    };

    let users_file = config.users_file_path();
    let writes = cli.script.writes();
    if writes && config.store == StoreType::Relational && users_file.is_none() {
        error!("Write script without users_file");
        eprintln!("configuration error: users_file must be set to persist changes");
        return ExitCode::from(78);
    }

    let driver = match &users_file {
        Some(path) => match MemoryDriver::from_file(path) {
            Ok(driver) => driver,
            Err(e) => {
                eprintln!("failed to load {}: {}", path.display(), e);
                return ExitCode::from(66);
            }
        },
        None => MemoryDriver::default(),
    };

    info!("Running script against {:?} store", config.store);
    let db = build_database(&config, driver.clone());

    match run(db.as_ref(), cli.script).await {
        Ok(value) => {
            if let (true, Some(path)) = (writes, &users_file) {
                if let Err(e) = driver.save(path).await {
                    error!("Failed to save {}: {}", path.display(), e);
                    eprintln!("failed to save {}: {}", path.display(), e);
                    return ExitCode::from(74);
                }
            }
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            handle_error(&e);
            eprintln!("{}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
