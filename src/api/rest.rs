use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::types::*;
use crate::store::StoreError;
use crate::sync::SyncEngine;

pub struct RestApi {
    engine: Arc<SyncEngine>,
}

impl RestApi {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self { engine }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/api/v1/sync", post(sync_file))
            .route("/api/v1/signatures", get(list_signatures))
            .route("/api/v1/signatures/:id", get(get_signature))
            .route("/api/v1/files", get(get_file_signature))
            .with_state(self.engine.clone())
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn sync_file(
    State(engine): State<Arc<SyncEngine>>,
    Json(req): Json<SyncRequest>,
) -> ApiResult<(StatusCode, Json<SyncResponse>)> {
    if req.file_path.is_empty() {
        return Err(ApiError::InvalidRequest("file_path is required".to_string()));
    }
    let path = PathBuf::from(&req.file_path);
    if !path.is_file() {
        return Err(ApiError::InvalidRequest(format!(
            "File not found: {}",
            req.file_path
        )));
    }

    let outcome = tokio::task::spawn_blocking(move || engine.handle(&path)).await??;
    let response = SyncResponse::from(&outcome);

    let status = match response.status {
        SyncStatus::Registered => StatusCode::CREATED,
        SyncStatus::Synchronized => StatusCode::OK,
    };
    Ok((status, Json(response)))
}

async fn list_signatures(
    State(engine): State<Arc<SyncEngine>>,
) -> ApiResult<Json<ListSignaturesResponse>> {
    let signatures = tokio::task::spawn_blocking(move || engine.store().list()).await??;
    let signatures: Vec<SignatureSummary> = signatures.iter().map(SignatureSummary::from).collect();

    Ok(Json(ListSignaturesResponse {
        count: signatures.len(),
        signatures,
    }))
}

async fn get_signature(
    State(engine): State<Arc<SyncEngine>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SignatureSummary>> {
    let id = Uuid::parse_str(&id)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid signature id: {e}")))?;

    let signature = tokio::task::spawn_blocking(move || engine.store().get(id))
        .await?
        .map_err(not_found)?;
    Ok(Json(SignatureSummary::from(&signature)))
}

async fn get_file_signature(
    State(engine): State<Arc<SyncEngine>>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<SignatureSummary>> {
    let path = PathBuf::from(query.path);
    let signature = tokio::task::spawn_blocking(move || {
        engine.store().get_signature_for_filename(&path)
    })
    .await?
    .map_err(not_found)?;
    Ok(Json(SignatureSummary::from(&signature)))
}

fn not_found(err: StoreError) -> ApiError {
    if err.is_not_found() {
        ApiError::NotFound(err.to_string())
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileio;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::Service;

    fn create_test_api() -> RestApi {
        let engine = SyncEngine::new(Arc::new(MemoryStore::new()));
        RestApi::new(Arc::new(engine))
    }

    fn sync_request(path: &std::path::Path) -> Request<Body> {
        let body = serde_json::to_vec(&SyncRequest {
            file_path: path.display().to_string(),
        })
        .unwrap();
        Request::builder()
            .method("POST")
            .uri("/api/v1/sync")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let api = create_test_api();
        let mut app = api.router();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.call(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_signatures_empty() {
        let api = create_test_api();
        let mut app = api.router();

        let request = Request::builder()
            .uri("/api/v1/signatures")
            .body(Body::empty())
            .unwrap();
        let response = app.call(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let list: ListSignaturesResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(list.count, 0);
        assert!(list.signatures.is_empty());
    }

    #[tokio::test]
    async fn test_sync_registers_then_synchronizes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("api.txt");
        fileio::write_to_file(&path, b"first version").unwrap();

        let api = create_test_api();
        let mut app = api.router();

        let response = app.call(sync_request(&path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let first: SyncResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(first.status, SyncStatus::Registered);
        assert!(first.delta.is_none());

        fileio::write_to_file(&path, b"second version").unwrap();

        let response = app.call(sync_request(&path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let second: SyncResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(second.status, SyncStatus::Synchronized);
        assert_eq!(second.signature.id, first.signature.id);
        assert_eq!(second.delta.unwrap().modified_offsets, vec![0]);

        let request = Request::builder()
            .uri(format!("/api/v1/signatures/{}", first.signature.id))
            .body(Body::empty())
            .unwrap();
        let response = app.call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let summary: SignatureSummary = serde_json::from_slice(&body).unwrap();
        assert_eq!(summary.file_size, 14);
    }

    #[tokio::test]
    async fn test_sync_missing_file_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let api = create_test_api();
        let mut app = api.router();

        let response = app
            .call(sync_request(&dir.path().join("missing.txt")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_nonexistent_signature() {
        let api = create_test_api();
        let mut app = api.router();

        let request = Request::builder()
            .uri(format!("/api/v1/signatures/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let response = app.call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = Request::builder()
            .uri("/api/v1/signatures/not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let response = app.call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_file_lookup() {
        let api = create_test_api();
        let mut app = api.router();

        let request = Request::builder()
            .uri("/api/v1/files?path=/never/saved.txt")
            .body(Body::empty())
            .unwrap();
        let response = app.call(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["code"], "NOT_FOUND");
        assert_eq!(
            error["error"],
            "Not found: No signature recorded for file: /never/saved.txt"
        );
    }
}
