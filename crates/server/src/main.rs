//! Schoolboard server entry point.

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use clap::{Parser, Subcommand};
use schoolboard_api::{AppState, router as api_router};
use schoolboard_common::{Config, LocalStorage};
use schoolboard_core::{
    AdminGate, MemeService, PollService, StudentService, UploadService, hash_passphrase,
};
use schoolboard_db::repositories::{
    ChoiceRepository, MemeLikeRepository, MemeRepository, PollRepository, StudentRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Room left in a request body for multipart framing and headers.
const BODY_SLACK: usize = 1024 * 1024;

/// Most files a single request uploads (a three-photo poll).
const MAX_FILES_PER_REQUEST: usize = 3;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print the Argon2 hash to put in `admin.passphrase_hash`.
    HashPassphrase {
        /// Admin passphrase to hash.
        passphrase: String,
    },
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(Command::HashPassphrase { passphrase }) = args.command {
        println!("{}", hash_passphrase(&passphrase)?);
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schoolboard=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting schoolboard server...");

    let config = Config::load()?;
    let admin_gate = AdminGate::from_config(&config.admin)?;

    // Connect to database
    let db = schoolboard_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    schoolboard_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let student_repo = StudentRepository::new(Arc::clone(&db));
    let poll_repo = PollRepository::new(Arc::clone(&db));
    let choice_repo = ChoiceRepository::new(Arc::clone(&db));
    let meme_repo = MemeRepository::new(Arc::clone(&db));
    let meme_like_repo = MemeLikeRepository::new(Arc::clone(&db));

    // Initialize services
    let storage = LocalStorage::from_config(&config.storage);
    let uploads = UploadService::new(Arc::new(storage), config.upload.max_file_size);

    let state = AppState {
        student_service: StudentService::new(
            student_repo,
            poll_repo.clone(),
            choice_repo.clone(),
        ),
        poll_service: PollService::new(poll_repo, choice_repo, uploads.clone()),
        meme_service: MemeService::new(meme_repo, meme_like_repo, uploads),
        admin_gate,
    };

    let body_limit = config
        .upload
        .max_file_size
        .saturating_mul(MAX_FILES_PER_REQUEST)
        .saturating_add(BODY_SLACK);

    // Build router
    let mut app = api_router().with_state(state);

    let content_prefix = config.storage.base_url.trim_end_matches('/');
    if content_prefix.starts_with('/') && !content_prefix.is_empty() {
        app = app.nest_service(content_prefix, ServeDir::new(&config.storage.base_path));
        info!(
            prefix = content_prefix,
            path = %config.storage.base_path.display(),
            "Serving uploaded content"
        );
    } else {
        warn!(
            base_url = %config.storage.base_url,
            "storage.base_url is not a local path, uploaded content is not served"
        );
    }

    let app: Router = app
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server with graceful shutdown
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
