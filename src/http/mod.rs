// ============================================================================
// HTTP Boundary - actix-web adapter over the order service
// ============================================================================
//
// Translates requests into service calls and `ServiceError` kinds into HTTP
// responses. Also serves /metrics and /health.
//
// ============================================================================

mod error;
mod handlers;

pub use error::ErrorBody;
pub use handlers::AppState;

use actix_web::{web, App, HttpServer};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/orders", web::post().to(handlers::create_order))
        .route("/orders/{order_id}/items", web::post().to(handlers::add_item))
        .route("/metrics", web::get().to(handlers::metrics))
        .route("/health", web::get().to(handlers::health));
}

pub async fn start_server(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    tracing::info!("Starting HTTP server on http://{}:{}", host, port);

    let state = web::Data::new(state);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind((host, port))?
        .run()
        .await
}
