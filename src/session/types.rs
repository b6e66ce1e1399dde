use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Which collection the token's `id` refers to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TokenKind {
    User,
    Admin,
}

/// JWT claims structure identifying the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub id: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

impl SessionClaims {
    pub fn is_admin(&self) -> bool {
        self.kind == TokenKind::Admin
    }
}
