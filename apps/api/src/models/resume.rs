use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted résumé. `data` is the serialized `NormalizedRecord`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredResume {
    pub id: Uuid,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}
