// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Closing instruction for prompts whose answer is parsed as JSON.
/// The Messages request carries no system prompt, so this rides in the user turn.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond ONLY with valid JSON (no markdown, no preamble):";
