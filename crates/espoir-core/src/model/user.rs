// ── User domain type ──

use serde::{Deserialize, Serialize};

/// An authenticated account, created on login/register or restored from
/// persistence, destroyed on logout.
///
/// The session token is stored as-is; encrypting the durable store is
/// out of scope for this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub session_token: String,
}
