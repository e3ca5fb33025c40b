use daftar::{
    AppState, Config, JalaliCalendar, LocalNotifications, Trackers, UnreadPoller, router,
    storage::{FileStore, Persistence},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    info!(data_dir = %config.data_dir.display(), seed = config.seed_samples, "starting");

    let persistence = Persistence::new(FileStore::open(&config.data_dir)?);
    let trackers = Trackers::open(&persistence, Arc::new(JalaliCalendar), config.seed_samples);
    let trackers = Arc::new(Mutex::new(trackers));

    let poller = UnreadPoller::spawn(LocalNotifications(Arc::clone(&trackers)), config.poll_interval);
    let state = AppState::new(trackers, poller.subscribe());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    poller.stop().await;
    Ok(())
}
