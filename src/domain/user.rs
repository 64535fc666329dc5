use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Public profile snapshot resolved from the user directory. Profile
/// management itself lives outside this service; this is the only shape the
/// messaging core ever sees.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
}
