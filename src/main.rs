use anyhow::Context;
use tokio::net::TcpListener;

use punchlog_core::api::{build_router, AppState};
use punchlog_core::{init_logger, Config};

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let config = Config::from_env();
    log::info!(
        "SERVER_CONFIG upstream={} login_path={} listing_path={} timeout_ms={} dedupe={} device_offset={}",
        config.upstream.base_url,
        config.upstream.login_path,
        config.upstream.listing_path,
        config.upstream.request_timeout.as_millis(),
        config.dedupe,
        config.device_utc_offset
    );

    let state = AppState::from_config(&config).context("building portal client")?;
    let app = build_router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    log::info!("SERVER_LISTENING addr={}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("serving")?;

    log::info!("SERVER_STOPPED");
    Ok(())
}
