use axum::{routing::get, Router};
use clap::Parser;
use fakeartist::room;
use fakeartist::{AppState, JsonFileStore};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fake-artist party game server
#[derive(Debug, Parser)]
struct Options {
    /// Bind address
    #[arg(long, default_value = "0.0.0.0:3000")]
    addr: String,

    /// Path of the JSON file holding the room dataset
    #[arg(long, default_value = "data/game-state.json")]
    data_path: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let options = Options::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fakeartist=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(data_path = %options.data_path.display(), "Starting fake-artist server");

    // All mutations go through the file-backed store; clients converge by
    // polling the GET endpoints below.
    let room_store = Arc::new(JsonFileStore::new(options.data_path));
    let app_state = AppState::new(room_store);

    let app = Router::new()
        .route("/", get(|| async { "fakeartist server" }))
        .route("/api/rooms", get(room::list_rooms))
        .route(
            "/api/room/:room_id",
            get(room::get_room).post(room::room_action),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&options.addr)
        .await
        .expect("failed to bind listen address");
    info!(addr = %options.addr, "Server running");
    axum::serve(listener, app).await.expect("server error");
}
