use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A designer's bid on a job.
///
/// `id` is the only stable handle for a bid. `bid_amount` and
/// `cover_letter` are NOT unique across a job's bids — two designers can
/// coincidentally submit the same amount or near-identical text — so any
/// matching by content is best-effort, never authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub job_id: Uuid,
    pub designer_id: Uuid,
    /// Non-negative; validated at placement.
    pub bid_amount: f64,
    pub cover_letter: String,
    pub experience_summary: String,
    pub created_at: DateTime<Utc>,
}
