//! Axum route handlers for the marketplace API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::bid::Bid;
use crate::models::designer::{normalize_skills, DesignerProfile, SkillTag};
use crate::models::job::Job;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterDesignerRequest {
    pub name: String,
    pub headline: String,
    /// Wire skills may be plain strings or `{id, text}` objects.
    #[serde(default)]
    pub skills: Vec<SkillTag>,
    #[serde(default)]
    pub bio: String,
    pub budget_range: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    /// Display string, stored verbatim — may be a range label or an amount.
    pub budget: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaceBidRequest {
    pub designer_id: Uuid,
    pub bid_amount: f64,
    pub cover_letter: String,
    pub experience_summary: String,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub job: Job,
    pub bid_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/designers
///
/// Registers a designer profile. Skills are normalized here so everything
/// downstream sees plain strings.
pub async fn handle_register_designer(
    State(state): State<AppState>,
    Json(request): Json<RegisterDesignerRequest>,
) -> Result<Json<DesignerProfile>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let profile = state.store.register_designer(
        request.name,
        request.headline,
        normalize_skills(request.skills),
        request.bio,
        request.budget_range,
        request.avatar_url,
    );

    Ok(Json(profile))
}

/// GET /api/v1/designers/:id
pub async fn handle_get_designer(
    State(state): State<AppState>,
    Path(designer_id): Path<Uuid>,
) -> Result<Json<DesignerProfile>, AppError> {
    state
        .store
        .get_designer(designer_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Designer {designer_id} not found")))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<Json<Job>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }
    if request.budget.trim().is_empty() {
        return Err(AppError::Validation("budget cannot be empty".to_string()));
    }

    let job = state.store.create_job(
        request.client_id,
        request.title,
        request.description,
        request.budget,
    );

    Ok(Json(job))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<Vec<Job>> {
    Json(state.store.list_jobs())
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let job = state
        .store
        .get_job(job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let bid_count = state.store.bids_for_job(job_id).len();

    Ok(Json(JobDetailResponse { job, bid_count }))
}

/// POST /api/v1/jobs/:id/bids
///
/// Places a bid. The store enforces the marketplace rules (job and designer
/// exist, non-negative amount, one bid per designer per job).
pub async fn handle_place_bid(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<PlaceBidRequest>,
) -> Result<Json<Bid>, AppError> {
    if request.cover_letter.trim().is_empty() {
        return Err(AppError::Validation(
            "cover_letter cannot be empty".to_string(),
        ));
    }

    let bid = state.store.place_bid(
        job_id,
        request.designer_id,
        request.bid_amount,
        request.cover_letter,
        request.experience_summary,
    )?;

    Ok(Json(bid))
}
