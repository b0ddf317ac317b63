//! Bid Summarization Service Contract — one natural-language evaluation
//! summary per bid, keyed by the caller-supplied profile descriptor.
//!
//! The wire shape is fixed (camelCase JSON, see `SummarizationRequest` /
//! `BidSummary`). The backend is treated as a remote capability: it may be
//! slow, may fail, may return entries out of order, and may omit entries on
//! partial failures. Callers reconcile the response themselves.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::evaluation::prompts::{SUMMARIZE_PROMPT_TEMPLATE, SUMMARIZE_SYSTEM};
use crate::llm_client::prompts::ECHO_KEYS_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};

/// Summary length cap, enforced by prompt instruction.
pub const SUMMARY_MAX_WORDS: usize = 60;

#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Transport or backend failure. Safe to retry; never retried
    /// automatically.
    #[error("summarization backend unavailable: {0}")]
    ServiceUnavailable(String),

    /// The backend answered, but the payload did not conform to the
    /// expected result shape. Malformed output is never partially trusted.
    #[error("summarization output did not match the expected shape: {0}")]
    SummaryFormat(String),

    /// Transport succeeded but zero entries came back for a non-empty
    /// request.
    #[error("summarization returned no entries for a non-empty request")]
    EmptyResult,

    /// Caller-side precondition failure; the backend was never called.
    #[error("invalid summarization request: {0}")]
    InvalidRequest(String),
}

/// Request sent to the summarization backend. Built fresh per call and
/// discarded once the call returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizationRequest {
    pub job_description: String,
    pub job_budget: String,
    pub bids: Vec<SummarizationItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizationItem {
    pub designer_profile: String,
    pub bid_amount: f64,
    pub experience_summary: String,
    pub cover_letter: String,
}

impl SummarizationRequest {
    /// Validates the contract preconditions: a non-empty batch and a
    /// non-empty descriptor on every item. Backend behavior on an empty
    /// descriptor is unspecified, so it is rejected before the call.
    pub fn new(
        job_description: String,
        job_budget: String,
        bids: Vec<SummarizationItem>,
    ) -> Result<Self, SummarizeError> {
        if bids.is_empty() {
            return Err(SummarizeError::InvalidRequest(
                "bids must not be empty".to_string(),
            ));
        }
        if bids.iter().any(|b| b.designer_profile.trim().is_empty()) {
            return Err(SummarizeError::InvalidRequest(
                "every bid needs a non-empty designer profile descriptor".to_string(),
            ));
        }
        Ok(Self {
            job_description,
            job_budget,
            bids,
        })
    }
}

/// One summary entry returned by the backend.
///
/// `designer_profile` is the copy-through correlation key. `bid_amount` and
/// `cover_letter` are echoes the prompt asks for so the fallback match has
/// something to compare; a backend that omits them still satisfies the
/// minimum contract, it just cannot be fallback-matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidSummary {
    pub designer_profile: String,
    pub summary: String,
    #[serde(default)]
    pub bid_amount: Option<f64>,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// The summarization capability. Stateless request/response; every call is
/// independent and safe to retry. Carried as `Arc<dyn BidSummarizer>` so
/// sessions and tests can swap backends.
#[async_trait]
pub trait BidSummarizer: Send + Sync {
    async fn summarize(
        &self,
        request: &SummarizationRequest,
    ) -> Result<Vec<BidSummary>, SummarizeError>;
}

/// Production summarizer backed by the LLM client.
pub struct LlmBidSummarizer {
    llm: LlmClient,
}

impl LlmBidSummarizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl BidSummarizer for LlmBidSummarizer {
    async fn summarize(
        &self,
        request: &SummarizationRequest,
    ) -> Result<Vec<BidSummary>, SummarizeError> {
        let prompt = build_summarize_prompt(request)?;

        let summaries: Vec<BidSummary> = self
            .llm
            .call_json(&prompt, SUMMARIZE_SYSTEM)
            .await
            .map_err(map_llm_error)?;

        if summaries.is_empty() {
            return Err(SummarizeError::EmptyResult);
        }

        debug!(
            "Summarization returned {} entries for {} bids",
            summaries.len(),
            request.bids.len()
        );

        Ok(summaries)
    }
}

fn map_llm_error(e: LlmError) -> SummarizeError {
    match e {
        LlmError::Parse(_) | LlmError::EmptyContent => {
            SummarizeError::SummaryFormat(e.to_string())
        }
        other => SummarizeError::ServiceUnavailable(other.to_string()),
    }
}

/// Fills the prompt template with the serialized request.
fn build_summarize_prompt(request: &SummarizationRequest) -> Result<String, SummarizeError> {
    let bids_json = serde_json::to_string_pretty(&request.bids).map_err(|e| {
        SummarizeError::InvalidRequest(format!("failed to serialize bids: {e}"))
    })?;

    Ok(SUMMARIZE_PROMPT_TEMPLATE
        .replace("{echo_keys_instruction}", ECHO_KEYS_INSTRUCTION)
        .replace("{max_words}", &SUMMARY_MAX_WORDS.to_string())
        .replace("{job_description}", &request.job_description)
        .replace("{job_budget}", &request.job_budget)
        .replace("{bids_json}", &bids_json))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(descriptor: &str) -> SummarizationItem {
        SummarizationItem {
            designer_profile: descriptor.to_string(),
            bid_amount: 1200.0,
            experience_summary: "5 years of brand work".to_string(),
            cover_letter: "I have 5 years...".to_string(),
        }
    }

    #[test]
    fn test_request_rejects_empty_batch() {
        let result = SummarizationRequest::new("desc".to_string(), "£500".to_string(), vec![]);
        assert!(matches!(result, Err(SummarizeError::InvalidRequest(_))));
    }

    #[test]
    fn test_request_rejects_blank_descriptor() {
        let result = SummarizationRequest::new(
            "desc".to_string(),
            "£500".to_string(),
            vec![item("profile"), item("   ")],
        );
        assert!(matches!(result, Err(SummarizeError::InvalidRequest(_))));
    }

    #[test]
    fn test_request_wire_shape_is_camel_case() {
        let request = SummarizationRequest::new(
            "Logo for a bakery".to_string(),
            "under £2000".to_string(),
            vec![item("profile-a")],
        )
        .unwrap();

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("jobDescription").is_some());
        assert!(value.get("jobBudget").is_some());
        let bid = &value["bids"][0];
        assert!(bid.get("designerProfile").is_some());
        assert!(bid.get("bidAmount").is_some());
        assert!(bid.get("experienceSummary").is_some());
        assert!(bid.get("coverLetter").is_some());
    }

    #[test]
    fn test_summary_deserializes_without_echo_fields() {
        // minimum contract shape — echoes are optional
        let json = r#"{"designerProfile": "p", "summary": "s"}"#;
        let summary: BidSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.designer_profile, "p");
        assert!(summary.bid_amount.is_none());
        assert!(summary.cover_letter.is_none());
    }

    #[test]
    fn test_summary_deserializes_with_echo_fields() {
        let json = r#"{
            "designerProfile": "p",
            "summary": "s",
            "bidAmount": 1200,
            "coverLetter": "I have 5 years..."
        }"#;
        let summary: BidSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.bid_amount, Some(1200.0));
        assert_eq!(summary.cover_letter.as_deref(), Some("I have 5 years..."));
    }

    #[test]
    fn test_prompt_echoes_budget_verbatim() {
        let request = SummarizationRequest::new(
            "Logo for a bakery".to_string(),
            "under £2000".to_string(),
            vec![item("profile-a")],
        )
        .unwrap();

        let prompt = build_summarize_prompt(&request).unwrap();
        assert!(prompt.contains("under £2000"));
        assert!(prompt.contains("Logo for a bakery"));
        assert!(prompt.contains("profile-a"));
        assert!(prompt.contains(&SUMMARY_MAX_WORDS.to_string()));
        assert!(!prompt.contains("{job_description}"));
        assert!(!prompt.contains("{max_words}"));
    }

    #[test]
    fn test_parse_errors_map_to_format_error() {
        let parse_err = serde_json::from_str::<BidSummary>("not json").unwrap_err();
        let mapped = map_llm_error(LlmError::Parse(parse_err));
        assert!(matches!(mapped, SummarizeError::SummaryFormat(_)));

        let mapped = map_llm_error(LlmError::EmptyContent);
        assert!(matches!(mapped, SummarizeError::SummaryFormat(_)));
    }

    #[test]
    fn test_transport_errors_map_to_service_unavailable() {
        let mapped = map_llm_error(LlmError::Api {
            status: 500,
            message: "overloaded".to_string(),
        });
        assert!(matches!(mapped, SummarizeError::ServiceUnavailable(_)));

        let mapped = map_llm_error(LlmError::RateLimited { retries: 3 });
        assert!(matches!(mapped, SummarizeError::ServiceUnavailable(_)));
    }
}
