use anyhow::Context;
use tokio::sync::mpsc;
use tracing::info;

use storefront_api::config::{init_tracing, load_config};
use storefront_api::db::{establish_connection, run_migrations};
use storefront_api::events::{process_events, EventSender};
use storefront_api::handlers::AppServices;
use storefront_api::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    init_tracing(&config.log_level, config.log_json);

    info!(environment = %config.environment, "starting storefront-api");

    let db = establish_connection(&config)
        .await
        .context("failed to connect to the database")?;

    if config.auto_migrate {
        run_migrations(&db)
            .await
            .context("failed to run migrations")?;
    }

    let (tx, rx) = mpsc::channel(100);
    tokio::spawn(process_events(rx));
    let events = EventSender::new(tx);

    let services = AppServices::new(db.clone(), &config, events);
    let app = build_router(db, services, &config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}
