//! Per-job orchestration: builds summarization requests, runs the backend
//! call, reconciles the response atomically onto the board.
//!
//! The board lock is never held across a backend call — readers observe
//! `SummaryPending` while a call is in flight, and a hung backend leaves
//! bids pending instead of wedging the rest of the API. In-flight calls per
//! job are bounded by a semaphore. The descriptor map built at request time
//! travels with the call frame (`SentItem`) and is never recomputed.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, Semaphore};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::board::{EvaluationBoard, SummaryState};
use crate::evaluation::ranking::RankedBid;
use crate::evaluation::reconcile::{reconcile, MatchPolicy, ReconcileReport, SentItem};
use crate::evaluation::summarizer::{
    BidSummarizer, SummarizationItem, SummarizationRequest, SummarizeError,
};
use crate::models::bid::Bid;
use crate::models::job::Job;
use crate::profiles::ProfileDirectory;

/// Outcome of a batch call, reported to the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub requested: usize,
    pub summarized: usize,
    /// Bids the response could not be reconciled to — returned to
    /// `NoSummary`, eligible for individual retry.
    pub unmatched: usize,
    /// Response entries no bid claimed.
    pub orphan_results: usize,
}

/// One job view's evaluation session.
pub struct JobEvaluation {
    board: Mutex<EvaluationBoard>,
    summarizer: Arc<dyn BidSummarizer>,
    profiles: Arc<dyn ProfileDirectory>,
    policy: MatchPolicy,
    in_flight: Semaphore,
}

impl JobEvaluation {
    pub fn new(
        job: Job,
        bids: Vec<Bid>,
        summarizer: Arc<dyn BidSummarizer>,
        profiles: Arc<dyn ProfileDirectory>,
        policy: MatchPolicy,
        max_in_flight: usize,
    ) -> Self {
        Self {
            board: Mutex::new(EvaluationBoard::new(job, bids)),
            summarizer,
            profiles,
            policy,
            in_flight: Semaphore::new(max_in_flight),
        }
    }

    /// Folds in bids placed since the session opened.
    pub async fn sync_bids(&self, bids: Vec<Bid>) {
        self.board.lock().await.sync_bids(bids);
    }

    /// Ranked, annotated snapshot of the working set.
    pub async fn ranked_bids(&self) -> Vec<RankedBid> {
        self.board.lock().await.ranked()
    }

    /// Summarizes exactly one bid.
    ///
    /// `SummaryPending → SummaryReady` on success. Any failure — including
    /// a response that cannot be matched back — leaves the bid
    /// `SummaryFailed` with the reason surfaced to the caller; retry is
    /// manual. Already-resolved and already-in-flight bids are a no-op.
    pub async fn summarize_single(&self, bid_id: Uuid) -> Result<(), AppError> {
        let _permit = self.acquire_slot().await?;

        let (bid, job_description, job_budget) = {
            let mut board = self.board.lock().await;
            let slot = board.slot(bid_id).ok_or_else(|| {
                AppError::NotFound(format!(
                    "Bid {bid_id} not found for job {}",
                    board.job().id
                ))
            })?;
            match slot.state {
                SummaryState::SummaryReady | SummaryState::SummaryPending => return Ok(()),
                SummaryState::NoSummary | SummaryState::SummaryFailed => {}
            }
            let bid = slot.bid.clone();
            let job_description = board.job().description.clone();
            let job_budget = board.job().budget.clone();
            board.mark_pending(bid_id);
            (bid, job_description, job_budget)
        };

        match self.run_single(&bid, job_description, job_budget).await {
            Ok(summary) => {
                self.board.lock().await.record_summary(bid_id, summary);
                info!("Summarized bid {bid_id}");
                Ok(())
            }
            Err(err) => {
                self.board.lock().await.mark_failed(bid_id);
                warn!("Summarization failed for bid {bid_id}: {err}");
                Err(AppError::Summarization(format!(
                    "Could not summarize bid {bid_id}: {err}"
                )))
            }
        }
    }

    /// Summarizes every bid still `NoSummary` in one backend call.
    ///
    /// An empty pending set is a no-op success with no backend call.
    /// Reconciliation is applied once over the whole response; bids it
    /// cannot match return to `NoSummary` rather than being marked failed —
    /// a batch-level miss is not an explicit per-bid failure. A whole-batch
    /// failure returns every targeted bid to `NoSummary` and surfaces one
    /// batch-scoped error.
    pub async fn summarize_all_pending(&self) -> Result<BatchOutcome, AppError> {
        let _permit = self.acquire_slot().await?;

        let (targets, job_description, job_budget) = {
            let mut board = self.board.lock().await;
            let targets = board.batch_targets();
            if targets.is_empty() {
                return Ok(BatchOutcome::default());
            }
            for bid in &targets {
                board.mark_pending(bid.id);
            }
            (
                targets,
                board.job().description.clone(),
                board.job().budget.clone(),
            )
        };

        info!("Batch summarization: {} pending bids", targets.len());

        match self.run_batch(&targets, job_description, job_budget).await {
            Ok(report) => {
                let mut board = self.board.lock().await;
                let summarized = report.assignments.len();
                let unmatched = report.unmatched_bids.len();
                for assignment in report.assignments {
                    board.record_summary(assignment.bid_id, assignment.summary);
                }
                for bid_id in report.unmatched_bids {
                    board.release_pending(bid_id);
                }
                if unmatched > 0 || report.orphan_results > 0 {
                    warn!(
                        "Batch reconciliation: {unmatched} bids unmatched, {} orphan entries",
                        report.orphan_results
                    );
                }
                Ok(BatchOutcome {
                    requested: targets.len(),
                    summarized,
                    unmatched,
                    orphan_results: report.orphan_results,
                })
            }
            Err(err) => {
                let mut board = self.board.lock().await;
                for bid in &targets {
                    board.release_pending(bid.id);
                }
                warn!("Batch summarization failed: {err}");
                Err(AppError::Summarization(format!(
                    "Could not summarize all pending bids: {err}"
                )))
            }
        }
    }

    async fn acquire_slot(&self) -> Result<tokio::sync::SemaphorePermit<'_>, AppError> {
        self.in_flight
            .acquire()
            .await
            .map_err(|_| AppError::Internal(anyhow::anyhow!("summarization limiter closed")))
    }

    async fn run_single(
        &self,
        bid: &Bid,
        job_description: String,
        job_budget: String,
    ) -> Result<String, SummarizeError> {
        let descriptor = self.build_descriptor(bid).await?;

        let sent = [SentItem {
            bid_id: bid.id,
            descriptor: descriptor.clone(),
            bid_amount: bid.bid_amount,
            cover_letter: bid.cover_letter.clone(),
        }];
        let request = SummarizationRequest::new(
            job_description,
            job_budget,
            vec![SummarizationItem {
                designer_profile: descriptor,
                bid_amount: bid.bid_amount,
                experience_summary: bid.experience_summary.clone(),
                cover_letter: bid.cover_letter.clone(),
            }],
        )?;

        let results = self.summarizer.summarize(&request).await?;

        let report = reconcile(&sent, &results, &self.policy);
        report
            .assignments
            .into_iter()
            .next()
            .map(|a| a.summary)
            .ok_or_else(|| {
                SummarizeError::SummaryFormat(
                    "response entry could not be matched back to the bid".to_string(),
                )
            })
    }

    async fn run_batch(
        &self,
        targets: &[Bid],
        job_description: String,
        job_budget: String,
    ) -> Result<ReconcileReport, SummarizeError> {
        let mut sent = Vec::with_capacity(targets.len());
        let mut items = Vec::with_capacity(targets.len());
        for bid in targets {
            let descriptor = self.build_descriptor(bid).await?;
            sent.push(SentItem {
                bid_id: bid.id,
                descriptor: descriptor.clone(),
                bid_amount: bid.bid_amount,
                cover_letter: bid.cover_letter.clone(),
            });
            items.push(SummarizationItem {
                designer_profile: descriptor,
                bid_amount: bid.bid_amount,
                experience_summary: bid.experience_summary.clone(),
                cover_letter: bid.cover_letter.clone(),
            });
        }

        let request = SummarizationRequest::new(job_description, job_budget, items)?;
        let results = self.summarizer.summarize(&request).await?;
        Ok(reconcile(&sent, &results, &self.policy))
    }

    async fn build_descriptor(&self, bid: &Bid) -> Result<String, SummarizeError> {
        self.profiles
            .build_descriptor(bid.designer_id)
            .await
            .map_err(|e| {
                SummarizeError::InvalidRequest(format!(
                    "could not build profile descriptor for designer {}: {e}",
                    bid.designer_id
                ))
            })
    }
}

/// Lazily opens one evaluation session per job and keeps it for the process
/// lifetime. Every job gets its own independent working copy; nothing about
/// a session is persisted.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Arc<JobEvaluation>>>,
    summarizer: Arc<dyn BidSummarizer>,
    profiles: Arc<dyn ProfileDirectory>,
    policy: MatchPolicy,
    max_in_flight: usize,
}

impl SessionRegistry {
    pub fn new(
        summarizer: Arc<dyn BidSummarizer>,
        profiles: Arc<dyn ProfileDirectory>,
        policy: MatchPolicy,
        max_in_flight: usize,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            summarizer,
            profiles,
            policy,
            max_in_flight,
        }
    }

    /// Opens (or retrieves) the session for a job and folds in newly placed
    /// bids.
    pub async fn open(&self, job: Job, bids: Vec<Bid>) -> Arc<JobEvaluation> {
        let session = {
            let mut sessions = self.sessions.lock().await;
            match sessions.get(&job.id) {
                Some(existing) => existing.clone(),
                None => {
                    let session = Arc::new(JobEvaluation::new(
                        job.clone(),
                        Vec::new(),
                        self.summarizer.clone(),
                        self.profiles.clone(),
                        self.policy.clone(),
                        self.max_in_flight,
                    ));
                    sessions.insert(job.id, session.clone());
                    session
                }
            }
        };
        session.sync_bids(bids).await;
        session
    }
}
