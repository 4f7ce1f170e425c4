//! Demo HTTP service over the sync engine

mod error;
mod rest;
mod types;

pub use error::{ApiError, ApiResult};
pub use rest::RestApi;
pub use types::*;

use crate::sync::SyncEngine;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the complete demo API router
pub fn create_api_server(engine: Arc<SyncEngine>) -> Router {
    let rest_api = RestApi::new(engine);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    rest_api
        .router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::Service;

    #[tokio::test]
    async fn test_api_server_creation() {
        let engine = Arc::new(SyncEngine::new(Arc::new(MemoryStore::new())));
        let mut app = create_api_server(engine);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.call(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
