use clap::Parser;
use dotenvy::dotenv;
use s3_upload_backend::config::AppConfig;
use s3_upload_backend::infrastructure::storage;
use s3_upload_backend::services::gateway::StorageGateway;
use s3_upload_backend::{AppState, create_app};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the API server to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port for the API server
    #[arg(short, long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    // Fails before logging is up if required settings are missing
    let config = AppConfig::from_env()?;

    let default_filter = if config.debug {
        "s3_upload_backend=debug,tower_http=debug"
    } else {
        "s3_upload_backend=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting {} v{}...", config.app_name, config.app_version);
    info!(
        "🛡️  Max upload size: {}MB, CORS origins: {}",
        config.max_file_size / 1024 / 1024,
        config.allowed_origins.join(", ")
    );

    let store = storage::setup_storage(&config).await;
    let gateway = Arc::new(StorageGateway::new(
        store,
        config.s3_bucket_name.clone(),
        config.aws_region.clone(),
    ));

    let state = AppState { gateway, config };

    let app = create_app(state);

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("✅ Server ready at http://{}", addr);
    info!("📖 Swagger UI: http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}
