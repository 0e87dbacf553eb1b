//! CORS middleware configuration

use tower_http::cors::CorsLayer;

/// Permissive CORS; browser clients may be served from any origin
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
