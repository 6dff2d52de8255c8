use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::app::confirmation_use_case::ConfirmationService;
use crate::domain::{RegistrationView, SubmissionRef};
use crate::error::RegistrationError;

#[derive(Clone)]
pub struct AppState {
    pub confirmations: Arc<ConfirmationService>,
}

/// Error body for the JSON API.
pub struct ApiError(RegistrationError);

impl From<RegistrationError> for ApiError {
    fn from(e: RegistrationError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RegistrationError::PageNotFound(_) | RegistrationError::SubmissionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            RegistrationError::Http(_) | RegistrationError::Api { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "registration-view",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn inscription_confirmation(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<RegistrationView>, ApiError> {
    let view = state
        .confirmations
        .confirmation(&slug, &SubmissionRef::Inscription { id })
        .await?;
    Ok(Json(view))
}

async fn group_confirmation(
    State(state): State<AppState>,
    Path((slug, group_id)): Path<(String, String)>,
) -> Result<Json<RegistrationView>, ApiError> {
    let view = state
        .confirmations
        .confirmation(&slug, &SubmissionRef::Group { group_id })
        .await?;
    Ok(Json(view))
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/pages/:slug/inscriptions/:id/confirmation",
            get(inscription_confirmation),
        )
        .route(
            "/api/pages/:slug/groups/:group_id/confirmation",
            get(group_confirmation),
        )
        .with_state(state)
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the specified port
pub async fn start_server(state: AppState, port: u16) -> std::io::Result<()> {
    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("HTTP server running on http://localhost:{}", port);
    info!("Health check: http://localhost:{}/health", port);

    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InscriptionRecord, PageDefinition};
    use crate::infra::in_memory::InMemorySource;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    fn router() -> Router {
        let source = Arc::new(InMemorySource::new());
        source.insert_page(PageDefinition::new("retiro", "Retiro")).unwrap();
        source
            .insert_inscription(InscriptionRecord::new("1", json!({ "Nome": "Ana" })).on_page("retiro"))
            .unwrap();
        create_router(AppState {
            confirmations: Arc::new(ConfirmationService::new(source)),
        })
    }

    async fn get_status(uri: &str) -> StatusCode {
        router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(get_status("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_confirmation_routes() {
        assert_eq!(
            get_status("/api/pages/retiro/inscriptions/1/confirmation").await,
            StatusCode::OK
        );
        assert_eq!(
            get_status("/api/pages/retiro/inscriptions/2/confirmation").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status("/api/pages/outro/inscriptions/1/confirmation").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status("/api/pages/retiro/groups/g1/confirmation").await,
            StatusCode::NOT_FOUND
        );
    }
}
