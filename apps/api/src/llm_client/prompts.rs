// Cross-cutting prompt fragments. Each service that needs LLM calls defines
// its own prompts.rs alongside it and composes these in.

/// Instruction for calls whose output must be re-correlated with the input:
/// the named fields are keys, not prose, and must survive the round trip
/// untouched.
pub const ECHO_KEYS_INSTRUCTION: &str = "\
    CRITICAL: Fields marked as correlation keys must be copied from the \
    input to the output byte-for-byte. Do NOT rephrase, translate, trim, \
    or reformat them — the caller uses them to match results back to the \
    originating records.";
