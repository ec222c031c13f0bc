mod context;
mod server;

use anyhow::{Context, Result};
use context::AppContext;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let settings = config::Settings::from_env();
    let bind_addr = settings.bind_addr.clone();

    let mut ctx = AppContext::build(settings).await.context("building application context")?;
    let job_receiver = ctx.job_receiver.take().expect("job receiver taken exactly once");

    let worker = ctx.worker.clone();
    let stop = worker::StopFlag::new();
    let worker_stop = stop.clone();
    let worker_handle = tokio::spawn(async move { worker::run(worker, job_receiver, worker_stop).await });

    let app = server::build_router(&ctx);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.context("binding HTTP listener")?;
    info!(bind_addr, "triaged listening");

    let serve_result = axum::serve(listener, app).await;

    stop.stop();
    let _ = worker_handle.await;
    serve_result.context("HTTP server error")
}
