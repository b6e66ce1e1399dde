//! Test assertion helpers - fluent API for verifying responses
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::http::StatusCode;
use serde_json::Value;

use super::actions::TestResponse;

// ============================================================================
// Assertion Helpers
// ============================================================================

impl TestResponse {
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "unexpected status, body: {}",
            self.body
        );
        self
    }

    /// Assert the `{"error": ...}` shape with an exact message
    pub fn assert_error(&self, expected: StatusCode, message: &str) -> &Self {
        self.assert_status(expected);
        assert_eq!(self.body["error"], message, "body: {}", self.body);
        self
    }

    /// Array stored under `key`
    pub fn list(&self, key: &str) -> &Vec<Value> {
        self.body[key]
            .as_array()
            .unwrap_or_else(|| panic!("expected array under {}, body: {}", key, self.body))
    }
}
