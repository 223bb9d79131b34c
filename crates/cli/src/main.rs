//! Glamora CLI - drive the Glamora client from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password from --password or GLAMORA_PASSWORD)
//! glamora login -e jane@glamora.app
//!
//! # Who is signed in?
//! glamora whoami
//!
//! # Browse the catalog
//! glamora products --category rings --limit 10
//!
//! # Generate a design
//! glamora design generate --type ring --style "art deco" -d "emerald center stone"
//!
//! # First-run gate
//! glamora onboarding show
//! glamora onboarding complete
//! ```
//!
//! # Environment Variables
//!
//! - `GLAMORA_API_BASE_URL` - Backend base URL
//! - `GLAMORA_DATA_DIR` - Where the token and onboarding flag are kept
//! - `GLAMORA_DESIGN_GENERATOR` - `simulated` or `remote`
//! - `SENTRY_DSN` - Optional error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use glamora_client::config::ClientConfig;
use glamora_client::storage::FileStore;
use glamora_client::{AppState, ClientError, telemetry};
use glamora_core::DesignType;
use secrecy::SecretString;

mod commands;
mod output;

/// File holding the bearer token.
const CREDENTIALS_FILE: &str = "credentials.json";
/// File holding app flags.
const LOCAL_FILE: &str = "local.json";

#[derive(Parser)]
#[command(name = "glamora")]
#[command(author, version, about = "Glamora jewelry client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "GLAMORA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "GLAMORA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List catalog products
    Products {
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },
    /// List your orders
    Orders {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Design generator
    Design {
        #[command(subcommand)]
        action: DesignAction,
    },
    /// First-run onboarding flag
    Onboarding {
        #[command(subcommand)]
        action: OnboardingAction,
    },
}

#[derive(Subcommand)]
enum DesignAction {
    /// Generate a new design
    Generate {
        /// Piece type (`necklace`, `bracelet`, `earrings`, `ring`)
        #[arg(short = 't', long = "type")]
        kind: DesignType,

        #[arg(short, long)]
        style: String,

        #[arg(short, long)]
        description: Option<String>,
    },
    /// List designs saved on the backend
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

#[derive(Subcommand)]
enum OnboardingAction {
    /// Print the route the app would start on
    Show,
    /// Mark onboarding as done
    Complete,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_tracing();
            ClientError::from(e).report();
            return ExitCode::FAILURE;
        }
    };

    // Sentry before the subscriber so the tracing layer has a client
    let _sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli, &config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

fn build_state(config: &ClientConfig) -> Result<AppState, ClientError> {
    let data_dir = &config.data_dir;
    let credentials = Arc::new(FileStore::new(data_dir.join(CREDENTIALS_FILE)));
    let local = Arc::new(FileStore::new(data_dir.join(LOCAL_FILE)));
    Ok(AppState::new(config, credentials, local)?)
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), ClientError> {
    let state = build_state(config)?;

    let result = match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&state, &email, &SecretString::from(password)).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(&state, &name, &email, &SecretString::from(password)).await,
        Commands::Logout => commands::auth::logout(&state).await,
        Commands::Whoami => commands::auth::whoami(&state).await,
        Commands::Products {
            category,
            search,
            page,
            limit,
        } => {
            commands::catalog::products(&state, glamora_client::api::ProductQuery {
                category,
                search,
                page,
                limit,
            })
            .await
        }
        Commands::Orders { page } => commands::catalog::orders(&state, page).await,
        Commands::Design { action } => match action {
            DesignAction::Generate {
                kind,
                style,
                description,
            } => commands::design::generate(&state, kind, &style, description.as_deref()).await,
            DesignAction::List { page, limit } => {
                commands::design::list(&state, page, limit).await
            }
        },
        Commands::Onboarding { action } => match action {
            OnboardingAction::Show => commands::onboarding::show(&state).await,
            OnboardingAction::Complete => commands::onboarding::complete(&state).await,
        },
    };

    state.shutdown().await;
    result
}
