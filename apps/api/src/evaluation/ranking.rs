//! Ranking policy — the total display order over a job's bids.

use serde::Serialize;

use crate::evaluation::board::{BidSlot, SummaryState};
use crate::models::bid::Bid;

/// A bid annotated for display: resolved summary (if any), lifecycle state,
/// and 1-based rank. Built per read from the board snapshot; never stored.
#[derive(Debug, Clone, Serialize)]
pub struct RankedBid {
    #[serde(flatten)]
    pub bid: Bid,
    pub summary: Option<String>,
    pub state: SummaryState,
    pub is_summary_pending: bool,
    pub rank: u32,
}

/// Orders a snapshot of bid slots for display and assigns ranks.
///
/// Primary key: bid amount ascending — best value surfaces first. Price
/// ties: bids with a resolved summary sort ahead of bids without one, so
/// actionable bids surface first within a tie. Full ties keep placement
/// order (the sort is stable), which keeps repeated reads reproducible.
pub fn rank_bids(slots: &[BidSlot]) -> Vec<RankedBid> {
    let mut ordered: Vec<&BidSlot> = slots.iter().collect();
    ordered.sort_by(|a, b| {
        a.bid
            .bid_amount
            .partial_cmp(&b.bid.bid_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.summary.is_some().cmp(&a.summary.is_some()))
    });

    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| RankedBid {
            bid: slot.bid.clone(),
            summary: slot.summary.clone(),
            state: slot.state,
            is_summary_pending: slot.state == SummaryState::SummaryPending,
            rank: (idx + 1) as u32,
        })
        .collect()
}
