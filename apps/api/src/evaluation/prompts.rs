// LLM prompt constants for bid summarization.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for bid summarization — enforces JSON-only output.
pub const SUMMARIZE_SYSTEM: &str =
    "You are an expert creative-services hiring assistant helping a client \
    evaluate designer bids on a job. \
    You MUST respond with valid JSON only — a JSON array of summary objects. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Bid summarization prompt template.
/// Replace: {echo_keys_instruction}, {max_words}, {job_description},
///          {job_budget}, {bids_json}
pub const SUMMARIZE_PROMPT_TEMPLATE: &str = r#"{echo_keys_instruction}

Evaluate each designer bid below against the job and write one short summary per bid to help the client compare them.

JOB DESCRIPTION:
{job_description}

CLIENT BUDGET (quote it exactly as written whenever you refer to it):
{job_budget}

BIDS (JSON array — `designerProfile` is a correlation key):
{bids_json}

Return a JSON ARRAY with exactly one object per input bid:
[
  {
    "designerProfile": "the designerProfile value from the bid, copied through unchanged",
    "bidAmount": 1200,
    "coverLetter": "the coverLetter value from the bid, copied through unchanged",
    "summary": "2-3 sentences on budget fit and experience relevance"
  }
]

HARD RULES:
1. `designerProfile`, `bidAmount` and `coverLetter` are correlation keys — copy each from the input bid unchanged
2. Each `summary` is at most {max_words} words
3. Lead with how the bid amount relates to the client budget, then how the designer's experience and cover letter fit the job
4. Write every summary in the same language as the job description
5. Use ONLY facts present in the bid and profile text — no invention
6. One output object per input bid — no more, no fewer"#;
