//! Reconciliation — maps summarization results back to their originating
//! bids.
//!
//! The backend's only declared key is the profile descriptor, a derived
//! string rather than a stable id. Matching is therefore exact-first with a
//! best-effort structural fallback, and the descriptor compared against is
//! the one retained from request-build time — never recomputed, since the
//! profile collaborator's output is not guaranteed deterministic across
//! calls.

use uuid::Uuid;

use crate::evaluation::summarizer::BidSummary;

/// Matching policy knobs.
#[derive(Debug, Clone)]
pub struct MatchPolicy {
    /// How many leading cover-letter characters the fallback match compares.
    pub cover_prefix_chars: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            cover_prefix_chars: 20,
        }
    }
}

/// Snapshot of one request item as it was sent.
#[derive(Debug, Clone)]
pub struct SentItem {
    pub bid_id: Uuid,
    /// The descriptor that actually went over the wire for this bid.
    pub descriptor: String,
    pub bid_amount: f64,
    pub cover_letter: String,
}

/// One reconciled (bid, summary) pairing.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub bid_id: Uuid,
    pub summary: String,
}

/// Outcome of reconciling one full response.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    pub assignments: Vec<Assignment>,
    /// Bids no result entry could be matched to. Not an error — they stay
    /// unresolved and eligible for retry.
    pub unmatched_bids: Vec<Uuid>,
    /// Result entries no bid claimed.
    pub orphan_results: usize,
}

/// Matches result entries to sent items. Two passes over the bids in their
/// original order, first match wins, each bid and each result entry
/// consumed at most once:
///
/// 1. exact — result descriptor byte-equal to the descriptor that was sent;
/// 2. fallback (only for bids pass 1 missed) — echoed bid amount exactly
///    equal AND echoed cover letter sharing the first
///    `cover_prefix_chars` characters.
///
/// The fallback can cross-assign when two bids share both amount and
/// cover-letter prefix; that is a known limitation of the descriptor-keyed
/// contract, accepted rather than papered over. Pure and idempotent: the
/// same inputs always produce the same report, and no result entry is ever
/// assigned to two bids.
pub fn reconcile(
    sent: &[SentItem],
    results: &[BidSummary],
    policy: &MatchPolicy,
) -> ReconcileReport {
    let mut consumed = vec![false; results.len()];
    let mut matched: Vec<Option<usize>> = vec![None; sent.len()];

    // Pass 1: exact descriptor match.
    for (si, item) in sent.iter().enumerate() {
        let hit = (0..results.len())
            .find(|&ri| !consumed[ri] && results[ri].designer_profile == item.descriptor);
        if let Some(ri) = hit {
            consumed[ri] = true;
            matched[si] = Some(ri);
        }
    }

    // Pass 2: structural fallback for the bids pass 1 missed.
    for (si, item) in sent.iter().enumerate() {
        if matched[si].is_some() {
            continue;
        }
        let hit = (0..results.len())
            .find(|&ri| !consumed[ri] && fallback_matches(item, &results[ri], policy));
        if let Some(ri) = hit {
            consumed[ri] = true;
            matched[si] = Some(ri);
        }
    }

    let mut report = ReconcileReport::default();
    for (si, item) in sent.iter().enumerate() {
        match matched[si] {
            Some(ri) => report.assignments.push(Assignment {
                bid_id: item.bid_id,
                summary: results[ri].summary.clone(),
            }),
            None => report.unmatched_bids.push(item.bid_id),
        }
    }
    report.orphan_results = consumed.iter().filter(|&&c| !c).count();
    report
}

fn fallback_matches(item: &SentItem, result: &BidSummary, policy: &MatchPolicy) -> bool {
    if result.bid_amount != Some(item.bid_amount) {
        return false;
    }
    let Some(cover) = result.cover_letter.as_deref() else {
        return false;
    };
    // Characters, not bytes — a multi-byte letter never splits the prefix.
    cover
        .chars()
        .take(policy.cover_prefix_chars)
        .eq(item.cover_letter.chars().take(policy.cover_prefix_chars))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent(descriptor: &str, amount: f64, cover: &str) -> SentItem {
        SentItem {
            bid_id: Uuid::new_v4(),
            descriptor: descriptor.to_string(),
            bid_amount: amount,
            cover_letter: cover.to_string(),
        }
    }

    fn result(descriptor: &str, summary: &str) -> BidSummary {
        BidSummary {
            designer_profile: descriptor.to_string(),
            summary: summary.to_string(),
            bid_amount: None,
            cover_letter: None,
        }
    }

    fn result_with_echo(descriptor: &str, summary: &str, amount: f64, cover: &str) -> BidSummary {
        BidSummary {
            designer_profile: descriptor.to_string(),
            summary: summary.to_string(),
            bid_amount: Some(amount),
            cover_letter: Some(cover.to_string()),
        }
    }

    fn summary_for(report: &ReconcileReport, bid_id: Uuid) -> Option<&str> {
        report
            .assignments
            .iter()
            .find(|a| a.bid_id == bid_id)
            .map(|a| a.summary.as_str())
    }

    #[test]
    fn test_exact_match_assigns_each_bid_its_own_summary() {
        // Same amount on both bids — descriptors alone must disambiguate.
        let items = vec![
            sent("profile-a", 1200.0, "Great fit for this..."),
            sent("profile-b", 1200.0, "I have 5 years..."),
        ];
        // Response order reversed relative to the request.
        let results = vec![
            result("profile-b", "summary for b"),
            result("profile-a", "summary for a"),
        ];

        let report = reconcile(&items, &results, &MatchPolicy::default());

        assert_eq!(report.assignments.len(), 2);
        assert_eq!(summary_for(&report, items[0].bid_id), Some("summary for a"));
        assert_eq!(summary_for(&report, items[1].bid_id), Some("summary for b"));
        assert!(report.unmatched_bids.is_empty());
        assert_eq!(report.orphan_results, 0);
    }

    #[test]
    fn test_duplicate_descriptors_consume_each_result_once() {
        // Two byte-identical profiles at call time — the central risk of the
        // descriptor-as-key contract. Each result must land on exactly one
        // bid, in original bid order.
        let items = vec![sent("twin", 100.0, "a"), sent("twin", 200.0, "b")];
        let results = vec![result("twin", "first"), result("twin", "second")];

        let report = reconcile(&items, &results, &MatchPolicy::default());

        assert_eq!(summary_for(&report, items[0].bid_id), Some("first"));
        assert_eq!(summary_for(&report, items[1].bid_id), Some("second"));
        assert_eq!(report.orphan_results, 0);
    }

    #[test]
    fn test_fallback_matches_altered_descriptors() {
        // Backend rewrote the descriptors, but echoed amount and cover
        // letter survive and are unique per bid.
        let items = vec![
            sent("profile-a", 1800.0, "Great fit for this project and team"),
            sent("profile-b", 1200.0, "I have 5 years of experience"),
        ];
        let results = vec![
            result_with_echo("REWRITTEN B", "summary for b", 1200.0, "I have 5 years of experience"),
            result_with_echo("REWRITTEN A", "summary for a", 1800.0, "Great fit for this project and team"),
        ];

        let report = reconcile(&items, &results, &MatchPolicy::default());

        assert_eq!(summary_for(&report, items[0].bid_id), Some("summary for a"));
        assert_eq!(summary_for(&report, items[1].bid_id), Some("summary for b"));
    }

    #[test]
    fn test_fallback_requires_both_amount_and_prefix() {
        let items = vec![sent("profile-a", 1200.0, "Great fit for this...")];
        // Same amount, different cover letter: no match.
        let results = vec![result_with_echo(
            "REWRITTEN",
            "s",
            1200.0,
            "Completely different text",
        )];

        let report = reconcile(&items, &results, &MatchPolicy::default());
        assert!(report.assignments.is_empty());
        assert_eq!(report.unmatched_bids, vec![items[0].bid_id]);
        assert_eq!(report.orphan_results, 1);
    }

    #[test]
    fn test_fallback_without_echo_fields_never_fires() {
        let items = vec![sent("profile-a", 1200.0, "Great fit for this...")];
        let results = vec![result("REWRITTEN", "s")];

        let report = reconcile(&items, &results, &MatchPolicy::default());
        assert!(report.assignments.is_empty());
    }

    #[test]
    fn test_fallback_ambiguity_first_match_wins() {
        // Known limitation: two bids sharing amount and cover prefix can
        // cross-assign. The contract is only that assignment is stable and
        // single-consumption.
        let items = vec![
            sent("profile-a", 500.0, "Hello, I would love to work on this"),
            sent("profile-b", 500.0, "Hello, I would love to help you out"),
        ];
        let results = vec![result_with_echo(
            "REWRITTEN",
            "only summary",
            500.0,
            "Hello, I would love to work on this",
        )];

        let report = reconcile(&items, &results, &MatchPolicy::default());

        // First 20 chars ("Hello, I would love ") are shared, so the first
        // bid in request order claims the single entry.
        assert_eq!(
            summary_for(&report, items[0].bid_id),
            Some("only summary")
        );
        assert_eq!(report.unmatched_bids, vec![items[1].bid_id]);
    }

    #[test]
    fn test_prefix_length_is_a_policy_knob() {
        let items = vec![
            sent("profile-a", 500.0, "Hello, I would love to work on this"),
            sent("profile-b", 500.0, "Hello, I would love to help you out"),
        ];
        let results = vec![
            result_with_echo("X", "for b", 500.0, "Hello, I would love to help you out"),
            result_with_echo("Y", "for a", 500.0, "Hello, I would love to work on this"),
        ];

        // Default 20-char prefix cannot tell these apart...
        let short = reconcile(&items, &results, &MatchPolicy::default());
        assert_eq!(summary_for(&short, items[0].bid_id), Some("for b"));

        // ...a longer prefix can.
        let policy = MatchPolicy {
            cover_prefix_chars: 30,
        };
        let long = reconcile(&items, &results, &policy);
        assert_eq!(summary_for(&long, items[0].bid_id), Some("for a"));
        assert_eq!(summary_for(&long, items[1].bid_id), Some("for b"));
    }

    #[test]
    fn test_prefix_compares_characters_not_bytes() {
        let cover = "désigner première classe et plus";
        let items = vec![sent("profile-a", 300.0, cover)];
        let results = vec![result_with_echo("ALTERED", "s", 300.0, cover)];

        let policy = MatchPolicy {
            cover_prefix_chars: 10,
        };
        let report = reconcile(&items, &results, &policy);
        assert_eq!(report.assignments.len(), 1);
    }

    #[test]
    fn test_missing_entries_leave_bids_unmatched() {
        let items = vec![
            sent("profile-a", 100.0, "a"),
            sent("profile-b", 200.0, "b"),
            sent("profile-c", 300.0, "c"),
        ];
        let results = vec![result("profile-a", "sa"), result("profile-c", "sc")];

        let report = reconcile(&items, &results, &MatchPolicy::default());

        assert_eq!(report.assignments.len(), 2);
        assert_eq!(report.unmatched_bids, vec![items[1].bid_id]);
        assert_eq!(report.orphan_results, 0);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let items = vec![
            sent("profile-a", 100.0, "cover a"),
            sent("profile-b", 100.0, "cover b"),
        ];
        let results = vec![
            result("profile-b", "sb"),
            result_with_echo("ALTERED", "sa", 100.0, "cover a"),
        ];

        let policy = MatchPolicy::default();
        let first = reconcile(&items, &results, &policy);
        let second = reconcile(&items, &results, &policy);

        let pairs = |r: &ReconcileReport| {
            r.assignments
                .iter()
                .map(|a| (a.bid_id, a.summary.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&first), pairs(&second));
        assert_eq!(first.unmatched_bids, second.unmatched_bids);
        assert_eq!(first.orphan_results, second.orphan_results);
    }

    #[test]
    fn test_empty_results_report_all_bids_unmatched() {
        let items = vec![sent("profile-a", 100.0, "a")];
        let report = reconcile(&items, &[], &MatchPolicy::default());
        assert!(report.assignments.is_empty());
        assert_eq!(report.unmatched_bids.len(), 1);
        assert_eq!(report.orphan_results, 0);
    }
}
