use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use medsafe_client::config::ClientConfig;
use medsafe_client::guard::{self, AppRoute, GuardDecision};
use medsafe_client::net::api::{ApiError, HttpAuthService};
use medsafe_client::session::{LoginError, Session, SessionController};
use medsafe_client::store::FileTokenStore;
use medsafe_client::validators::{self, IdRejection};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Login(#[from] LoginError),
    #[error("could not read password from stdin: {0}")]
    Stdin(#[from] io::Error),
    #[error("unknown route: {0}")]
    UnknownRoute(String),
    #[error("{0}")]
    InvalidId(IdRejection),
    #[error("access denied: {0:?}")]
    Denied(GuardDecision),
}

#[derive(Parser, Debug)]
#[command(name = "medsafe", about = "MedSafe client session and access checks")]
struct Cli {
    #[arg(long, env = "MEDSAFE_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "MEDSAFE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the session.
    Login {
        #[arg(long)]
        username: String,
        /// Read from stdin when omitted.
        #[arg(long, env = "MEDSAFE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log out and clear the persisted session.
    Logout,
    /// Show who is logged in.
    Status {
        /// Also confirm the session with the server.
        #[arg(long)]
        remote: bool,
    },
    /// Print the guard decision for a route path.
    Check { path: String },
    /// List routes available to the current session.
    Nav,
    /// Validate a national ID number.
    ValidateId { id: String },
    /// Format a national ID number for display.
    FormatId { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { api_url, session_file, command } = cli;
    let config = build_config(api_url, session_file);
    match command {
        Command::Login { username, password } => {
            let session = open_session(&config)?;
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            let user = session.login(&username, &password).await?;
            println!("logged in as {} ({})", user.full_name, user.role);
        }
        Command::Logout => {
            let session = open_session(&config)?;
            session.logout().await;
            println!("logged out");
        }
        Command::Status { remote } => {
            let session = open_session(&config)?;
            let snapshot = session.snapshot();
            print_status(&snapshot);
            if let (true, Some(token)) = (remote, snapshot.token()) {
                let user = HttpAuthService::from_config(&config)?.current_user(token).await?;
                println!("server:  confirmed {} ({})", user.username, user.role);
            }
        }
        Command::Check { path } => {
            let session = open_session(&config)?;
            let route = AppRoute::from_path(&path).ok_or(CliError::UnknownRoute(path))?;
            let decision = route.decide(&session.snapshot());
            match decision.redirect() {
                None => println!("{}: allow", route.path()),
                Some(target) => {
                    println!("{}: deny -> {target}", route.path());
                    return Err(CliError::Denied(decision));
                }
            }
        }
        Command::Nav => {
            let session = open_session(&config)?;
            for route in guard::navigation(&session.snapshot()) {
                println!("{:<18} {}", route.path(), route.title());
            }
        }
        Command::ValidateId { id } => run_validate_id(&id)?,
        Command::FormatId { id } => println!("{}", validators::format_national_id(&id)),
    }
    Ok(())
}

/// Env config with CLI overrides applied.
fn build_config(api_url: Option<String>, session_file: Option<PathBuf>) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = api_url.as_deref() {
        config = config.with_api_url(url);
    }
    if let Some(path) = session_file {
        config = config.with_session_file(path);
    }
    config
}

/// Build the controller and restore the persisted session.
fn open_session(config: &ClientConfig) -> Result<SessionController, CliError> {
    let auth = HttpAuthService::from_config(config)?;
    let store = FileTokenStore::new(config.session_file.clone());
    let session = SessionController::new(Arc::new(auth), Arc::new(store));
    session.restore();
    Ok(session)
}

fn run_validate_id(id: &str) -> Result<(), CliError> {
    let result = validators::validate_national_id(id);
    match result.reason {
        None => {
            println!("{}: {}", validators::format_national_id(id), result.message());
            Ok(())
        }
        Some(reason) => {
            println!("{}: {}", reason.code(), result.message());
            Err(CliError::InvalidId(reason))
        }
    }
}

fn print_status(session: &Session) {
    match session {
        Session::Authenticated(auth) => {
            println!("user:    {} <{}>", auth.user.full_name, auth.user.email);
            println!("login:   {}", auth.user.username);
            println!("role:    {}", auth.user.role);
            println!("expires: {} (epoch seconds)", auth.expires_at);
        }
        Session::Unauthenticated | Session::Restoring => println!("not logged in"),
    }
}

fn read_password() -> Result<String, CliError> {
    eprint!("password: ");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
