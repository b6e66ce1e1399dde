pub mod actions;
pub mod assertions;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::TestResponse;
#[allow(unused_imports)]
pub use setup::{TestApp, TestAppBuilder, ADMIN_EMAIL, ADMIN_PASSWORD, TEST_SECRET};
