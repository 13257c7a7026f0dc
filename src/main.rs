use anyhow::Result;
use hostwatch::*;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let engine_state = engine::EngineState::new(app_config.engine_settings())
        .map_err(|e| anyhow::anyhow!("engine init: {}", e))?;
    let engine = engine::Engine::new(engine_state);

    let cpu_window = std::time::Duration::from_millis(app_config.sampling.cpu_window_ms);
    let source: Arc<dyn metric_source::MetricSource> = Arc::new(
        tokio::task::spawn_blocking(move || metric_source::SysinfoSource::new(cpu_window)).await?,
    );

    let (views_tx, _) =
        broadcast::channel::<models::EngineView>(app_config.publishing.broadcast_capacity);
    let sinks: Vec<Arc<dyn sink::PresentationSink>> = vec![
        Arc::new(sink::BroadcastSink::new(views_tx.clone())),
        Arc::new(sink::LogSink),
    ];

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let (_, interval) = engine
        .schedule()
        .map_err(|e| anyhow::anyhow!("engine schedule: {}", e))?;
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            engine: engine.clone(),
            source,
            sink: Arc::new(sinks),
            shutdown_rx,
        },
        worker::WorkerConfig {
            stats_log_interval_secs: app_config.sampling.stats_log_interval_secs,
        },
        scheduler::IntervalTicker::new(interval),
    );
    tracing::info!(
        interval_ms = interval.as_millis() as u64,
        history_capacity = app_config.sampling.history_capacity,
        version = version::PKG_VERSION,
        "Engine started"
    );

    let ws_state_connections = Arc::new(AtomicUsize::new(0));
    let app = routes::app(engine, views_tx, ws_state_connections);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
        }
    }

    Ok(())
}
