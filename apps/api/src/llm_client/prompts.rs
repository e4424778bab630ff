// Shared prompt fragments. Each module that calls the LLM keeps its own
// prompts.rs alongside it and reuses these.

/// Appended to every system prompt so the response carries a single JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with a single JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Joins a role description with the JSON-only instruction.
pub fn json_system_prompt(role: &str) -> String {
    format!("{role} {JSON_ONLY_INSTRUCTION}")
}
