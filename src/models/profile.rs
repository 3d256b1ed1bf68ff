use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public display data for a user. The private account record (credentials,
/// sessions) lives elsewhere; this is the shape other users see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}
