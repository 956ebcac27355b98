use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use binpack_core::{
    validate_result, Optimization, Optimizer, PackError, PackRequest, PackResult,
    ValidationReport,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting sheet packing API");

    let addr = std::env::var("BINPACK_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);

    axum::serve(listener, app()).await?;
    Ok(())
}

fn app() -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/pack", post(pack))
        .route("/api/validate", post(validate))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "binpack-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main packing endpoint
async fn pack(Json(request): Json<PackRequest>) -> Result<Json<Optimization>, AppError> {
    info!(
        "Received pack request with {} panel specs on {}x{} sheets",
        request.panels.len(),
        request.sheet_width,
        request.sheet_height
    );

    let optimizer = Optimizer::new(request)?;
    let result = optimizer.optimize();

    info!(
        "Packing complete: {} sheets, {} unpacked, {:.2}% waste",
        result.summary.total_sheets, result.summary.unpacked_panels, result.summary.waste_percentage
    );

    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
struct ValidationRequest {
    padding: f64,
    #[serde(flatten)]
    result: PackResult,
}

/// Checks a layout produced elsewhere
async fn validate(Json(request): Json<ValidationRequest>) -> Json<ValidationReport> {
    let report = validate_result(&request.result, request.padding);
    info!(
        "Validated {} sheets: {} issue(s)",
        report.sheets,
        report.issues.len()
    );
    Json(report)
}

/// Application error type
struct AppError(anyhow::Error);

impl From<PackError> for AppError {
    fn from(err: PackError) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        let status = if self.0.downcast_ref::<PackError>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(json!({
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_service() {
        let response = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn pack_returns_layout() {
        let (status, body) = post_json(
            "/api/pack",
            json!({
                "sheet_width": 200,
                "sheet_height": 200,
                "panels": [{ "id": "shelf", "width": 100, "height": 50 }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["total_sheets"], 1);
        assert_eq!(body["bins"][0]["efficiency"], 12.5);
        assert_eq!(body["bins"][0]["rects"][0]["id"], "shelf");
    }

    #[tokio::test]
    async fn invalid_request_is_bad_request() {
        let (status, body) = post_json(
            "/api/pack",
            json!({ "sheet_width": 200, "sheet_height": 200, "panels": [] }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid input"));
    }

    #[tokio::test]
    async fn validate_flags_overlap() {
        let (status, body) = post_json(
            "/api/validate",
            json!({
                "padding": 3,
                "bins": [{
                    "width": 200, "height": 200, "free_rects": [],
                    "used_area": 5000, "efficiency": 12.5,
                    "rects": [
                        { "id": "a", "x": 0, "y": 0, "width": 50, "height": 50, "rotated": false },
                        { "id": "b", "x": 51, "y": 0, "width": 50, "height": 50, "rotated": false }
                    ]
                }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["issues"][0]["kind"], "overlap");
    }
}
