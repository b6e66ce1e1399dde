use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};

// ============================================================================
// Action Helpers
// ============================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Send a request through the full router; `token` goes into a Bearer header
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    /// Register a user and return (token, user id)
    pub async fn register_user(&self, name: &str, email: &str, password: &str) -> (String, String) {
        let response = self
            .send(
                "POST",
                "/api/users/register",
                None,
                Some(json!({ "name": name, "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        (
            response.body["token"].as_str().unwrap().to_string(),
            response.body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Log in as the bootstrap admin and return the token
    pub async fn admin_token(&self) -> String {
        let response = self
            .send(
                "POST",
                "/api/admin/login",
                None,
                Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        response.body["token"].as_str().unwrap().to_string()
    }

    /// Place an order and return its business id
    pub async fn place_order(&self, token: &str, body: Value) -> String {
        let response = self.send("POST", "/api/orders", Some(token), Some(body)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["order"]["orderId"]
            .as_str()
            .unwrap()
            .to_string()
    }
}
