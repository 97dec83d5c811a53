use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sea_orm::Database;
use tracing::info;

use yamdb_api::config::{ApiConfig, LogFormat};
use yamdb_api::error::ApiError;
use yamdb_api::router::build_router;
use yamdb_api::state::AppState;
use yamdb_api::usecase::user::{CreateSuperuserInput, CreateSuperuserUseCase};
use yamdb_auth_types::identity::JwtSecret;
use yamdb_core::tracing::init_tracing;

#[derive(Parser)]
#[command(about = "YaMDb review API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Create an admin account that signs in with a password
    CreateSuperuser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// Falls back to the SUPERUSER_PASSWORD environment variable
        #[arg(long, env = "SUPERUSER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ApiConfig::from_env()?;
    init_tracing(config.log_format == LogFormat::Json);

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState {
        db,
        jwt_secret: JwtSecret(config.jwt_secret),
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let router = build_router(state);
            let addr = format!("0.0.0.0:{}", config.api_port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            info!("api service listening on {addr}");
            axum::serve(listener, router).await.context("server error")?;
        }
        Command::CreateSuperuser {
            username,
            email,
            password,
        } => {
            let usecase = CreateSuperuserUseCase {
                users: state.user_repo(),
            };
            usecase
                .execute(CreateSuperuserInput {
                    username,
                    email,
                    password,
                })
                .await
                .map_err(|e| match e {
                    ApiError::Validation(fields) => {
                        anyhow::anyhow!("create superuser: invalid input {fields:?}")
                    }
                    other => anyhow::Error::new(other).context("create superuser"),
                })?;
        }
    }
    Ok(())
}
