//! Social book cataloguing backend.
//!
//! REST/JSON API over MySQL: registration, login, library entries with
//! uploaded cover images, likes, follows, and a global activity feed.
//! Also serves the prebuilt client bundle, with any unmatched path falling
//! back to the entry document so client-side routing works.

use std::{path::Path, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post, put},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod upload;
pub mod utils;

use routes::{
    books_handler, create_book_handler, feed_handler, follow_handler, like_handler,
    login_handler, register_handler, update_user_handler,
};
use state::State;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any)
        .max_age(Duration::from_secs(60 * 60));

    let index = Path::new(&state.config.public_dir).join("index.html");

    let app = Router::new()
        .route("/api/register", post(register_handler))
        .route("/api/login", post(login_handler))
        .route("/api/books", get(books_handler).post(create_book_handler))
        .route("/api/feed", get(feed_handler))
        .route("/api/books/{id}/like", post(like_handler))
        .route("/api/follow", post(follow_handler))
        .route("/api/users/{id}", put(update_user_handler))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .fallback_service(
            ServeDir::new(&state.config.public_dir).not_found_service(ServeFile::new(index)),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
