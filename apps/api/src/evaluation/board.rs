//! Evaluation board — the owned working set of bids for one job view.
//!
//! One board per session, keyed by bid id, kept in placement order. All
//! state transitions go through the methods here; pure reads feed the
//! ranking. Nothing on the board is ever persisted — summaries are cheap to
//! regenerate and the source bids are immutable.

use serde::Serialize;
use uuid::Uuid;

use crate::evaluation::ranking::{rank_bids, RankedBid};
use crate::models::bid::Bid;
use crate::models::job::Job;

/// Per-bid summarization lifecycle.
///
/// `NoSummary → SummaryPending → SummaryReady` (terminal within a session)
/// or `→ SummaryFailed` (terminal for that attempt; a fresh single-bid call
/// re-enters `SummaryPending`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryState {
    NoSummary,
    SummaryPending,
    SummaryReady,
    SummaryFailed,
}

/// One bid's working state on the board.
#[derive(Debug, Clone)]
pub struct BidSlot {
    pub bid: Bid,
    pub state: SummaryState,
    pub summary: Option<String>,
}

impl BidSlot {
    fn new(bid: Bid) -> Self {
        Self {
            bid,
            state: SummaryState::NoSummary,
            summary: None,
        }
    }
}

/// The arena of bid slots for one job.
#[derive(Debug)]
pub struct EvaluationBoard {
    job: Job,
    slots: Vec<BidSlot>,
}

impl EvaluationBoard {
    pub fn new(job: Job, bids: Vec<Bid>) -> Self {
        Self {
            job,
            slots: bids.into_iter().map(BidSlot::new).collect(),
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    /// Folds in bids placed since the board was opened. Existing slots keep
    /// their state; unseen bids join as `NoSummary`.
    pub fn sync_bids(&mut self, bids: Vec<Bid>) {
        for bid in bids {
            if !self.slots.iter().any(|s| s.bid.id == bid.id) {
                self.slots.push(BidSlot::new(bid));
            }
        }
    }

    pub fn slot(&self, bid_id: Uuid) -> Option<&BidSlot> {
        self.slots.iter().find(|s| s.bid.id == bid_id)
    }

    fn slot_mut(&mut self, bid_id: Uuid) -> Option<&mut BidSlot> {
        self.slots.iter_mut().find(|s| s.bid.id == bid_id)
    }

    /// Bids a batch call targets: everything still `NoSummary`. `SummaryReady`
    /// is never redone, `SummaryPending` is already in flight, and an
    /// explicit `SummaryFailed` is retried per bid rather than swept into
    /// the next batch.
    pub fn batch_targets(&self) -> Vec<Bid> {
        self.slots
            .iter()
            .filter(|s| s.state == SummaryState::NoSummary)
            .map(|s| s.bid.clone())
            .collect()
    }

    /// Marks a bid in flight. Only `NoSummary` and `SummaryFailed` can enter
    /// `SummaryPending`; returns whether the transition happened.
    pub fn mark_pending(&mut self, bid_id: Uuid) -> bool {
        match self.slot_mut(bid_id) {
            Some(slot)
                if slot.state == SummaryState::NoSummary
                    || slot.state == SummaryState::SummaryFailed =>
            {
                slot.state = SummaryState::SummaryPending;
                true
            }
            _ => false,
        }
    }

    /// Lands a resolved summary: `SummaryReady`, terminal. Racing calls are
    /// last-writer-wins, which the contract allows.
    pub fn record_summary(&mut self, bid_id: Uuid, summary: String) {
        if let Some(slot) = self.slot_mut(bid_id) {
            slot.state = SummaryState::SummaryReady;
            slot.summary = Some(summary);
        }
    }

    /// Marks an explicit per-bid failure. Never downgrades `SummaryReady`.
    pub fn mark_failed(&mut self, bid_id: Uuid) {
        if let Some(slot) = self.slot_mut(bid_id) {
            if slot.state != SummaryState::SummaryReady {
                slot.state = SummaryState::SummaryFailed;
            }
        }
    }

    /// Returns an in-flight bid to `NoSummary` — used when a batch fails or
    /// misses it, leaving it actionable rather than failed.
    pub fn release_pending(&mut self, bid_id: Uuid) {
        if let Some(slot) = self.slot_mut(bid_id) {
            if slot.state == SummaryState::SummaryPending {
                slot.state = SummaryState::NoSummary;
            }
        }
    }

    /// Ranked, annotated snapshot for display.
    pub fn ranked(&self) -> Vec<RankedBid> {
        rank_bids(&self.slots)
    }
}
