use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use userservice::{
    config::{get_config, init_config},
    database::{migrate::run_migrations, pool::create_pool},
    routes,
    utils::logging::init_tracing,
    AppState,
};

/// HTTP service for managing users
#[derive(Parser)]
#[command(name = "userservice")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_config()?;
    let config = get_config();
    init_tracing(config.log_format);

    let pool = create_pool(config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Migrate => {
            run_migrations(&pool).await?;
        }
        Command::Serve => {
            if config.auto_migrate {
                run_migrations(&pool).await?;
            }

            let app = routes::router(AppState::new(pool)).layer(TraceLayer::new_for_http());

            let addr: SocketAddr = config.server_address.parse()?;
            info!("Server listening on {}", addr);
            let listener = TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            info!("Server stopped");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = ?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
