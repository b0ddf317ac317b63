//! Axum route handlers for the bid evaluation API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::ranking::RankedBid;
use crate::evaluation::session::{BatchOutcome, JobEvaluation};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// Display card for the bidding designer. Enrichment only — absent when the
/// profile lookup has nothing; the ranked bid itself is complete without it.
#[derive(Debug, Serialize)]
pub struct DesignerCard {
    pub name: String,
    pub headline: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankedBidView {
    #[serde(flatten)]
    pub ranked: RankedBid,
    pub designer: Option<DesignerCard>,
}

#[derive(Debug, Serialize)]
pub struct RankedBidsResponse {
    pub job_id: Uuid,
    pub bids: Vec<RankedBidView>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeBidResponse {
    pub bid: RankedBid,
}

#[derive(Debug, Serialize)]
pub struct SummarizeAllResponse {
    pub job_id: Uuid,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Opens (or syncs) the job's evaluation session from the store.
async fn open_session(state: &AppState, job_id: Uuid) -> Result<Arc<JobEvaluation>, AppError> {
    let job = state
        .store
        .get_job(job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let bids = state.store.bids_for_job(job_id);
    Ok(state.sessions.open(job, bids).await)
}

/// GET /api/v1/jobs/:id/bids/ranked
///
/// The ranked, annotated bid list for a job. Pure read of session state —
/// no summarization is triggered here.
pub async fn handle_ranked_bids(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<RankedBidsResponse>, AppError> {
    let session = open_session(&state, job_id).await?;
    let ranked = session.ranked_bids().await;

    let mut bids = Vec::with_capacity(ranked.len());
    for entry in ranked {
        let designer = state
            .profiles
            .designer_details(entry.bid.designer_id)
            .await?
            .map(|p| DesignerCard {
                name: p.name,
                headline: p.headline,
                avatar_url: p.avatar_url,
            });
        bids.push(RankedBidView {
            ranked: entry,
            designer,
        });
    }

    Ok(Json(RankedBidsResponse { job_id, bids }))
}

/// POST /api/v1/jobs/:id/bids/:bid_id/summarize
///
/// Summarizes a single bid. On failure the bid lands in `summary_failed`
/// and the error names the bid so the client can scope its retry notice.
pub async fn handle_summarize_bid(
    State(state): State<AppState>,
    Path((job_id, bid_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SummarizeBidResponse>, AppError> {
    let session = open_session(&state, job_id).await?;
    session.summarize_single(bid_id).await?;

    let bid = session
        .ranked_bids()
        .await
        .into_iter()
        .find(|r| r.bid.id == bid_id)
        .ok_or_else(|| AppError::NotFound(format!("Bid {bid_id} not found")))?;

    Ok(Json(SummarizeBidResponse { bid }))
}

/// POST /api/v1/jobs/:id/bids/summarize-all
///
/// Summarizes every bid still without a summary in one backend call.
/// A job with nothing pending returns a zero-count outcome.
pub async fn handle_summarize_all(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<SummarizeAllResponse>, AppError> {
    let session = open_session(&state, job_id).await?;
    let outcome = session.summarize_all_pending().await?;

    Ok(Json(SummarizeAllResponse { job_id, outcome }))
}
