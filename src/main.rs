use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use webserve::config::Config;
use webserve::server::Listener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let mut cfg = Config::load()?;
    if let Some(port) = std::env::args().nth(1) {
        cfg.set_port(&port)?;
    }
    cfg.validate()?;

    let addr = cfg.server.listen_addr();
    let listener = Listener::bind(&addr, cfg.static_files.clone()).await?;
    tracing::info!("Open browser: http://localhost:{}/", cfg.server.port);

    let (stop_tx, stop_rx) = watch::channel(false);
    let mut server = tokio::spawn(listener.run(stop_rx));

    tokio::select! {
        res = &mut server => {
            return res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    let _ = stop_tx.send(true);
    server.await?
}
