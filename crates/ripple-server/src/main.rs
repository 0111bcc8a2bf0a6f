use error_stack::{Result, ResultExt};
use ripple_server::App;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, Instrument};

#[derive(Debug, Error)]
#[error("Could not start Ripple HTTP server")]
struct StartError;

#[tracing::instrument(skip_all, name = "server.run")]
async fn start_ripple_server(config: ripple_config::Config) -> Result<(), StartError> {
    let app = App::new(config).await.change_context(StartError)?;

    debug!("binding server");
    let listener = TcpListener::bind((app.config.server.ip, app.config.server.port))
        .await
        .change_context(StartError)
        .attach_printable("could not bind server with address and port")?;

    let addr = listener
        .local_addr()
        .change_context(StartError)
        .attach_printable("could not get socket address of the server")?;

    let make_service = ripple_server::build_axum_router(app.clone())
        .into_make_service_with_connect_info::<SocketAddr>();

    info!(
        "Ripple HTTP server is listening at http://{addr} with {} workers",
        app.config.server.workers
    );

    axum::serve(listener, make_service)
        .with_graceful_shutdown(
            async {
                shutdown_signal().await;
                info!("Received graceful shutdown signal. Shutting down server...");
            }
            .instrument(tracing::Span::current()),
        )
        .await
        .change_context(StartError)
        .attach_printable("could not serve Ripple HTTP service")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(..) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

fn main() -> Result<(), StartError> {
    dotenvy::dotenv().ok();

    let config = ripple_config::Config::from_env().change_context(StartError)?;
    ripple_tracing::init(&config.logging).change_context(StartError)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(config.server.workers)
        .build()
        .change_context(StartError)?;

    rt.block_on(start_ripple_server(config))
}
