//! HTTP front-end over the library operations.

pub mod error;
pub mod routes;

use crate::config::Config;
use crate::core::context::AppContext;
use crate::errors::{AppError, AppResult};
use axum::Router;
use axum::routing::{delete, get, post};
use routes::SharedContext;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Build the router with all routes.
pub fn router(ctx: SharedContext) -> Router {
    let api = Router::new()
        .route("/", get(routes::root))
        // schedule
        .route("/schedule/upload-file", post(routes::upload_file))
        .route("/schedule/manual", post(routes::upload_manual))
        .route("/schedule/current", get(routes::current_schedule))
        .route("/schedule/{id}", delete(routes::delete_schedule))
        // sessions
        .route("/session/start", post(routes::start_session))
        .route("/session/end", post(routes::end_session))
        .route("/session/edit", post(routes::edit_session))
        .route("/session/photo", post(routes::add_photo))
        .route("/session/active", get(routes::active_session))
        .route("/sessions/history", get(routes::history))
        // settings & email
        .route(
            "/settings",
            get(routes::get_settings).post(routes::update_settings),
        )
        .route("/email/send", post(routes::send_email));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::root))
        .nest("/api", api)
        .layer(cors)
        .with_state(ctx)
}

/// Start the HTTP server and block until it stops.
pub fn serve(cfg: &Config, port: Option<u16>) -> AppResult<()> {
    let ctx = Arc::new(AppContext::from_config(cfg)?);
    let port = port.unwrap_or(cfg.server_port);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let app = router(ctx);

        let listener = tokio::net::TcpListener::bind(format!("[::]:{port}")).await?;
        log::info!("listening on port {port}");
        crate::ui::messages::info(format!("Serving API on http://localhost:{port}/api"));

        axum::serve(listener, app).await?;
        Ok::<(), AppError>(())
    })
}
