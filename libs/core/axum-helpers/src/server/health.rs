use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

/// Name and version reported by the liveness endpoint.
#[derive(Clone, Debug)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl ServiceInfo {
    pub const fn new(name: &'static str, version: &'static str) -> Self {
        Self { name, version }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

async fn health_handler(State(info): State<ServiceInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        name: info.name,
        version: info.version,
    })
}

/// Router exposing `GET /health`; always 200 while the process is up.
pub fn health_router(info: ServiceInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_name_and_version() {
        let app = health_router(ServiceInfo::new("accounts-api", "1.2.3"));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["name"], "accounts-api");
        assert_eq!(body["version"], "1.2.3");
    }
}
