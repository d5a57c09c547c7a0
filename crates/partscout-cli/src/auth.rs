//! `auth` command handlers.
//!
//! A successful login prints the issued token; export it as
//! `PARTSCOUT_AUTH_TOKEN` to send it with later searches.

use clap::Subcommand;
use partscout_client::{AuthSession, Credentials, PartsClient};
use partscout_core::AppConfig;

/// Sub-commands available under `auth`.
#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in with email and password
    Login {
        #[arg(long)]
        login: String,
        #[arg(long, env = "PARTSCOUT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new account
    Register {
        #[arg(long)]
        login: String,
        #[arg(long, env = "PARTSCOUT_PASSWORD", hide_env_values = true)]
        password: String,
        /// Anti-abuse token issued by the service
        #[arg(long)]
        guard_hash: Option<String>,
    },
    /// Confirm an email address with the emailed code
    Confirm {
        #[arg(long)]
        login: String,
        #[arg(long)]
        code: Option<String>,
        /// The code came from a password recovery request
        #[arg(long)]
        recovery: bool,
    },
    /// Request a password recovery code
    Recover {
        #[arg(long)]
        login: String,
        #[arg(long)]
        guard_hash: Option<String>,
    },
}

/// Dispatches one `auth` sub-command.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the service rejects the
/// request.
pub(crate) async fn run_auth(config: &AppConfig, command: AuthCommands) -> anyhow::Result<()> {
    let client = PartsClient::new(config)?;

    let session = match command {
        AuthCommands::Login { login, password } => {
            client.authorize(&Credentials::new(login, password)).await?
        }
        AuthCommands::Register {
            login,
            password,
            guard_hash,
        } => {
            client
                .create_user(&Credentials::new(login, password), guard_hash.as_deref())
                .await?
        }
        AuthCommands::Confirm {
            login,
            code,
            recovery,
        } => {
            client
                .confirm_email(&Credentials::login_only(login), code.as_deref(), recovery)
                .await?
        }
        AuthCommands::Recover { login, guard_hash } => {
            client
                .password_recovery(&Credentials::login_only(login), guard_hash.as_deref())
                .await?
        }
    };

    report(&session)
}

fn report(session: &AuthSession) -> anyhow::Result<()> {
    match &session.token {
        Some(token) if session.is_authenticated() => {
            tracing::info!("authenticated");
            println!("token: {token}");
        }
        _ => println!("ok"),
    }
    if !session.data.is_null() {
        println!("{}", serde_json::to_string_pretty(&session.data)?);
    }
    Ok(())
}
