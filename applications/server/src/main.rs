/// Murmur Server - minimal commenting service
use clap::{Parser, Subcommand};
use murmur_core::storage::CommentStore;
use murmur_server::{
    config::{generate_secret_key, ServerConfig},
    create_router,
    services::CsrfService,
    state::{AppState, RateLimits},
};
use murmur_storage::LocalStorageContext;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "murmur-server")]
#[command(about = "Murmur commenting service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Wipe and recreate the database schema on boot (demo mode)
        #[arg(long)]
        ephemeral: bool,
    },
    /// Print a fresh secret key for `security.secret_key`
    GenerateSecret,
    /// List all comments, newest first
    ListComments {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murmur_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, ephemeral } => {
            serve(config, ephemeral).await?;
        }
        Commands::GenerateSecret => {
            println!("{}", generate_secret_key());
        }
        Commands::ListComments { config } => {
            list_comments(config).await?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>, ephemeral: bool) -> anyhow::Result<()> {
    // Load configuration
    let mut config = ServerConfig::load(config_path.as_deref())?;
    config.ephemeral |= ephemeral;
    config.validate()?;

    tracing::info!("Starting Murmur Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = murmur_storage::create_pool(&config.storage.database_url).await?;
    if config.ephemeral {
        murmur_storage::reset_schema(&pool).await?;
    } else {
        murmur_storage::run_migrations(&pool).await?;
    }
    let db = Arc::new(LocalStorageContext::new(pool));
    tracing::info!("Database connected");

    // Initialize CSRF service with the one secret for this process
    let secret_key = config.resolve_secret_key()?;
    let csrf = Arc::new(CsrfService::new(
        &secret_key,
        config.security.csrf_token_ttl_secs,
    ));

    let limits = RateLimits::from_settings(&config.rate_limit);
    if config.rate_limit.enabled {
        tracing::info!(
            "Rate limits: submit {}, like {}",
            limits.submit.describe(),
            limits.like.describe()
        );
    } else {
        tracing::warn!("Rate limiting is disabled");
    }

    // Build application state
    let app_state = AppState::new(db, csrf, limits, config.uploads.max_content_length);

    // Build router
    let app = create_router(app_state, &config);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server; rate limiting needs the peer address
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn list_comments(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?;
    let pool = murmur_storage::create_pool(&config.storage.database_url).await?;
    murmur_storage::run_migrations(&pool).await?;

    let db = LocalStorageContext::new(pool);
    let comments = db.list_comments().await?;

    println!("Comments ({}):", comments.len());
    for comment in comments {
        println!(
            "  #{} [{} likes] {} - {}",
            comment.id,
            comment.likes,
            comment.created_at.to_rfc3339(),
            comment.text
        );
    }

    Ok(())
}
