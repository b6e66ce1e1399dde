use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{
    ServiceDetailResponse, ServiceListResponse, ServiceSavedResponse, UpdateServiceRequest,
    UpsertServiceRequest,
};
use crate::shared::{AppError, AppJson, AppState, MessageResponse};

/// GET /services
#[instrument(name = "list_services", skip(state))]
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<ServiceListResponse>, AppError> {
    let services = state.catalog_service().list_services().await?;

    info!(service_count = services.len(), "Services listed");
    Ok(Json(ServiceListResponse { services }))
}

/// GET /services/:id
#[instrument(name = "get_service", skip(state))]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceDetailResponse>, AppError> {
    let service = state.catalog_service().get_service(&id).await?;
    Ok(Json(ServiceDetailResponse { service }))
}

/// POST /services (admin)
/// Creates the service or replaces the one with the same id
#[instrument(name = "upsert_service", skip(state, request))]
pub async fn upsert_service(
    State(state): State<AppState>,
    AppJson(request): AppJson<UpsertServiceRequest>,
) -> Result<Json<ServiceSavedResponse>, AppError> {
    let service = state.catalog_service().upsert_service(request).await?;

    Ok(Json(ServiceSavedResponse {
        message: "Service saved successfully".to_string(),
        service,
    }))
}

/// PUT /services/:id (admin)
#[instrument(name = "update_service", skip(state, request))]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateServiceRequest>,
) -> Result<Json<ServiceSavedResponse>, AppError> {
    let service = state
        .catalog_service()
        .update_service(&id, request)
        .await?;

    Ok(Json(ServiceSavedResponse {
        message: "Service updated successfully".to_string(),
        service,
    }))
}

/// DELETE /services/:id (admin)
#[instrument(name = "delete_service", skip(state))]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.catalog_service().delete_service(&id).await?;
    Ok(Json(MessageResponse::new("Service deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::repository::{
        tests::helpers::create_test_service, InMemoryServiceRepository, ServiceRepository,
    };
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/services", get(list_services).post(upsert_service))
            .route(
                "/services/:id",
                get(get_service).put(update_service).delete(delete_service),
            )
            .with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_list_services() {
        let services = Arc::new(InMemoryServiceRepository::new());
        services
            .upsert_service(&create_test_service("wash", "Wash"))
            .await
            .unwrap();
        let state = AppStateBuilder::new()
            .with_service_repository(services)
            .build();

        let request = Request::builder()
            .uri("/services")
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["services"].as_array().unwrap().len(), 1);
        assert_eq!(json["services"][0]["name"], "Wash");
    }

    #[tokio::test]
    async fn test_upsert_twice_lists_once() {
        let state = AppStateBuilder::new().build();
        let app = app(state);

        for name in ["Ironing", "Steam Ironing"] {
            let request = Request::builder()
                .method("POST")
                .uri("/services")
                .header("content-type", "application/json")
                .body(Body::from(format!(
                    r#"{{"id": "ironing", "name": "{}", "price": 50}}"#,
                    name
                )))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                body_json(response).await["message"],
                "Service saved successfully"
            );
        }

        let request = Request::builder()
            .uri("/services")
            .body(Body::empty())
            .unwrap();
        let json = body_json(app.oneshot(request).await.unwrap()).await;
        let services = json["services"].as_array().unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0]["name"], "Steam Ironing");
    }

    #[tokio::test]
    async fn test_get_unknown_service() {
        let state = AppStateBuilder::new().build();

        let request = Request::builder()
            .uri("/services/nope")
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Service not found");
    }

    #[tokio::test]
    async fn test_update_and_delete_service() {
        let services = Arc::new(InMemoryServiceRepository::new());
        services
            .upsert_service(&create_test_service("wash", "Wash"))
            .await
            .unwrap();
        let state = AppStateBuilder::new()
            .with_service_repository(services.clone())
            .build();
        let app = app(state);

        let request = Request::builder()
            .method("PUT")
            .uri("/services/wash")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"description": "Washed and folded"}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["service"]["name"], "Wash");
        assert_eq!(json["service"]["description"], "Washed and folded");

        let request = Request::builder()
            .method("DELETE")
            .uri("/services/wash")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(services.service_count(), 0);
    }
}
