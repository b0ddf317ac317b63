use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A design job posted by a client.
///
/// `budget` is the user-facing display value — a raw amount ("£1500") or a
/// bucketed range label ("under £2000"). It is echoed verbatim into
/// generated bid summaries, so it is stored and passed around as text and
/// never parsed or reformatted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: String,
    pub created_at: DateTime<Utc>,
}
