use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::IntoMakeService,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

pub mod content;
pub mod health;
pub mod locales;

pub fn router(state: AppState, cors_origins: &[HeaderValue]) -> IntoMakeService<Router> {
    let base_routes = Router::new()
        .merge(health::router())
        .merge(locales::router())
        .merge(content::router());

    Router::new()
        .nest("/api", base_routes)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .into_make_service()
}

fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins.iter().cloned()))
    }
}
