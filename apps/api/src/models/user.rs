use serde::{Deserialize, Serialize};

/// The authenticated user as returned by the store's auth endpoints and cached
/// in the `user` cookie. Unknown fields from the store are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}
