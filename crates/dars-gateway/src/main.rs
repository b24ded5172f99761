use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use dars_core::DarsConfig;
use dars_portal::PortalFetcher;
use dars_scheduler::{Daily, DailyEngine};
use dars_timetable::{Refresher, ScheduleCache};
use tracing::{info, warn};

mod app;
mod http;
mod jobs;
#[cfg(test)]
mod testing;

/// Serves today's and tomorrow's class subjects from the school portal export.
#[derive(Debug, Parser)]
#[command(name = "dars-gateway", version)]
struct Cli {
    /// Config file (default: $DARS_CONFIG, then ./dars.toml).
    #[arg(short, long)]
    config: Option<String>,

    /// Fetch the schedule once at boot instead of on the first request.
    #[arg(long)]
    refresh_on_start: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dars_gateway=info,dars_timetable=info,dars_portal=info,dars_scheduler=info,tower_http=info"
                    .into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // No defaults for credentials or the access key: a bad config is fatal.
    let config = DarsConfig::load(cli.config.as_deref())?;
    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let cache = Arc::new(ScheduleCache::new());
    let fetcher = Arc::new(PortalFetcher::new(config.portal.clone()));
    let refresher = Arc::new(
        Refresher::new(fetcher, cache).with_fetch_timeout(config.refresh.fetch_timeout()),
    );

    // daily timer: unconditional refresh at HH:MM local time
    let daily = Daily::new(config.refresh.hour, config.refresh.minute)?;
    let engine = DailyEngine::new(daily, Arc::new(jobs::DailyRefresh::new(refresher.clone())));
    let refresh_state = engine.subscribe();

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let engine_task = tokio::spawn(engine.run(shutdown_rx));

    if cli.refresh_on_start || config.refresh.on_start {
        let warm = refresher.clone();
        tokio::spawn(async move {
            match warm.refresh_now(Local::now()).await {
                Ok(_) => info!("schedule cache warmed at startup"),
                Err(e) => warn!(error = %e, "startup refresh failed; first request will retry"),
            }
        });
    }

    let state = Arc::new(app::AppState::new(
        config.gateway.clone(),
        refresher,
        refresh_state,
    ));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("dars gateway listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // signal the timer to stop
    let _ = shutdown_tx.send(true);
    let _ = engine_task.await;
    info!("dars gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
