use std::fs;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use rand::RngCore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use libero::auth::{Hasher, TokenService};
use libero::config::ServerConfig;
use libero::mail::Mailer;
use libero::server::{AppState, cors_layer, create_router};
use libero::store::{MemoryStore, SqliteStore, Store, seed};

const JWT_SECRET_ENV: &str = "LIBERO_JWT_SECRET";

#[derive(Parser)]
#[command(name = "libero")]
#[command(about = "A volleyball club membership server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database and mail spool
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Allowed CORS origin; repeat for several. Defaults to any origin.
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,

        /// Run against an in-process store instead of the database.
        /// Nothing survives a restart; intended for demos and tests.
        #[arg(long)]
        ephemeral: bool,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the database: schema, achievement catalog, training slots
    Init {
        /// Data directory for the database and mail spool
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

fn run_init(data_dir: String, non_interactive: bool) -> anyhow::Result<()> {
    let data_path: std::path::PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let store = SqliteStore::new(data_path.join("libero.db"))?;
    store.initialize()?;
    seed::seed_catalog(&store)?;

    println!("Database initialized at {}", data_path.display());

    if non_interactive {
        return Ok(());
    }

    create_admin_prompt(&store)
}

fn create_admin_prompt(store: &SqliteStore) -> anyhow::Result<()> {
    if store.admin_exists()? {
        println!("An admin account already exists; skipping admin creation.");
        return Ok(());
    }

    let create_admin = inquire::Confirm::new("Would you like to create an admin account?")
        .with_default(true)
        .prompt()?;

    if !create_admin {
        return Ok(());
    }

    let email = inquire::Text::new("Admin email:")
        .with_validator(|input: &str| {
            if input.contains('@') {
                Ok(inquire::validator::Validation::Valid)
            } else {
                Err("Enter a valid email address".into())
            }
        })
        .prompt()?;

    let password = inquire::Password::new("Admin password:")
        .with_validator(|input: &str| {
            if input.len() >= 8 {
                Ok(inquire::validator::Validation::Valid)
            } else {
                Err("Password must be at least 8 characters".into())
            }
        })
        .prompt()?;

    let hasher = Hasher::new();
    let email = email.trim().to_ascii_lowercase();
    match seed::seed_admin(store, &hasher, &email, &password)? {
        Some(_) => println!("Admin account '{email}' created."),
        None => println!("An admin account already exists; nothing created."),
    }

    Ok(())
}

fn jwt_secret() -> Vec<u8> {
    match std::env::var(JWT_SECRET_ENV) {
        Ok(secret) if !secret.is_empty() => secret.into_bytes(),
        _ => {
            warn!(
                "{JWT_SECRET_ENV} is not set; using a random secret. \
                 Issued tokens will not survive a restart."
            );
            let mut secret = vec![0u8; 32];
            rand::thread_rng().fill_bytes(&mut secret);
            secret
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("libero=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                non_interactive,
            } => {
                run_init(data_dir, non_interactive)?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            cors_origins,
            ephemeral,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                cors_origins,
            };

            let store: Arc<dyn Store> = if ephemeral {
                warn!("Running with the ephemeral in-memory store; nothing will be persisted");
                let store = MemoryStore::new();
                store.initialize()?;
                seed::seed_catalog(&store)?;
                Arc::new(store)
            } else {
                if !config.db_path().exists() {
                    bail!(
                        "Server not initialized. Run 'libero admin init' first to create the database."
                    );
                }
                let store = SqliteStore::new(config.db_path())?;
                store.initialize()?;
                Arc::new(store)
            };

            let state = Arc::new(AppState::new(
                store,
                TokenService::new(&jwt_secret()),
                Mailer::new(config.outbox_dir()),
            ));

            let app = create_router(state, cors_layer(&config.cors_origins));
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
