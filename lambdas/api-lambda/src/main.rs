use lambda_http::{run, service_fn, Error, Request};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use todo_shared::{AppState, Config};

mod http_handler;
mod static_files;

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_http::tracing::init_default_subscriber();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::connect(config).await?);

    let shared_state = &state;
    let result = tokio::select! {
        result = run(service_fn(move |event: Request| async move {
            http_handler::function_handler(event, Arc::clone(shared_state)).await
        })) => result,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            Ok(())
        }
    };

    state.shutdown().await;
    result
}

/// Resolves on SIGTERM (sent by Lambda before it stops the sandbox) or Ctrl-C
/// for local runs.
async fn shutdown_signal() {
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = terminate => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}
