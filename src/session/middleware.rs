use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use super::types::SessionClaims;
use crate::shared::{AppError, AppState};

/// JWT authentication middleware - validates Authorization Bearer header and adds SessionClaims to request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::jwt_auth))
/// Handlers can then extract Extension(claims): Extension<SessionClaims>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    info!(
        "JWT authentication middleware triggered for request {}",
        req.uri()
    );

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .unwrap_or_default();

    // Second whitespace-separated segment, whatever the scheme
    let token = auth_header.split_whitespace().nth(1).ok_or_else(|| {
        warn!("Missing access token in request");
        AppError::Unauthorized("Access token required".to_string())
    })?;

    let claims = match state.token_config.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(e);
        }
    };

    info!(
        id = %claims.id,
        kind = %claims.kind,
        "Authentication successful, adding claims to request"
    );

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Rejects tokens whose type is not `admin`. Must run after `jwt_auth`.
#[instrument(skip(req, next))]
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<SessionClaims>()
        .ok_or_else(|| AppError::Unauthorized("Access token required".to_string()))?;

    if !claims.is_admin() {
        warn!(id = %claims.id, kind = %claims.kind, "Non-admin token on admin route");
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TokenKind;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt; // for `oneshot`

    async fn whoami(Extension(claims): Extension<SessionClaims>) -> String {
        claims.id
    }

    fn app(state: AppState) -> Router {
        let admin = Router::new()
            .route("/admin-only", get(whoami))
            .route_layer(middleware::from_fn(require_admin));

        Router::new()
            .route("/me", get(whoami))
            .merge(admin)
            .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
            .with_state(state)
    }

    async fn send(app: Router, uri: &str, auth: Option<String>) -> (StatusCode, String) {
        let mut builder = HttpRequest::builder().method("GET").uri(uri);
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let state = AppStateBuilder::new().build();
        let (status, body) = send(app(state), "/me", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Access token required"}"#);
    }

    #[tokio::test]
    async fn test_invalid_token_is_forbidden() {
        let state = AppStateBuilder::new().build();
        let (status, body) = send(app(state), "/me", Some("Bearer garbage".to_string())).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, r#"{"error":"Invalid or expired token"}"#);
    }

    #[tokio::test]
    async fn test_valid_token_passes_claims() {
        let state = AppStateBuilder::new().build();
        let token = state
            .token_config
            .create_token("user-42", "jane@example.com", TokenKind::User)
            .unwrap();

        let (status, body) = send(app(state), "/me", Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user-42");
    }

    #[tokio::test]
    async fn test_user_token_rejected_on_admin_route() {
        let state = AppStateBuilder::new().build();
        let token = state
            .token_config
            .create_token("user-42", "jane@example.com", TokenKind::User)
            .unwrap();

        let (status, body) =
            send(app(state), "/admin-only", Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, r#"{"error":"Admin access required"}"#);
    }

    #[tokio::test]
    async fn test_admin_token_allowed_on_admin_route() {
        let state = AppStateBuilder::new().build();
        let token = state
            .token_config
            .create_token("admin-1", "admin@example.com", TokenKind::Admin)
            .unwrap();

        let (status, body) =
            send(app(state), "/admin-only", Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "admin-1");
    }
}
