use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flashcard_study::config::Settings;
use flashcard_study::error::LogOnError;
use flashcard_study::grading::{GeminiTransport, GradingClient};
use flashcard_study::state::AppState;
use flashcard_study::{db, handlers};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "flashcard_study=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = Settings::load();

  let pool = db::init_db(&settings.database_path).expect("Failed to initialize database");

  let transport = GeminiTransport::new(&settings.grading).expect("Failed to build grading transport");
  let grader = Arc::new(GradingClient::new(Arc::new(transport)));
  tracing::info!(
    model = %settings.grading.model,
    timeout_secs = settings.grading.timeout.as_secs(),
    "Grading client ready"
  );

  let state = AppState::new(pool, grader, settings.grading.timeout);
  let shutdown = state.shutdown.clone();
  let app = handlers::router(state).layer(TraceLayer::new_for_http());

  let bind_addr = settings.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://{}", bind_addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal(shutdown))
    .await
    .expect("Server failed to start");
}

/// Resolve on Ctrl-C, cancelling grading calls that are still running
async fn shutdown_signal(shutdown: CancellationToken) {
  if tokio::signal::ctrl_c()
    .await
    .log_warn("Failed to listen for shutdown signal")
    .is_none()
  {
    std::future::pending::<()>().await;
  }
  tracing::info!("Shutting down, cancelling in-flight grading");
  shutdown.cancel();
}
