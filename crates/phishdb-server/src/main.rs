mod api;
mod scheduler;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(phishdb_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = Arc::new(
        phishdb_store::Store::connect(&config.database_path, &config.snapshot_path).await?,
    );

    let client = phishdb_feeds::FeedClient::from_config(&config)?;
    let refresher = Arc::new(phishdb_pipeline::Refresher::new(client, Arc::clone(&store)));

    let classifier = match &config.classifier_url {
        Some(url) => Some(Arc::new(phishdb_classify::RemoteClassifier::new(
            url,
            config.feed_timeout_secs,
        )?)),
        None => None,
    };

    let last_report = Arc::new(RwLock::new(None));
    let _scheduler = scheduler::build_scheduler(
        Arc::clone(&refresher),
        Arc::clone(&last_report),
        &config.refresh_cron,
    )
    .await?;

    let app = build_app(AppState {
        store,
        refresher,
        classifier,
        last_report,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "phishdb-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
