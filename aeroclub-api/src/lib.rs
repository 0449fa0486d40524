use axum::http::{HeaderName, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod aircraft;
pub mod auth;
pub mod bookings;
pub mod conflicts;
pub mod error;
pub mod state;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
            HeaderName::from_static("x-actor-id"),
            HeaderName::from_static("x-actor-role"),
        ]);

    Router::new()
        .merge(bookings::routes())
        .merge(conflicts::routes())
        .merge(aircraft::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
