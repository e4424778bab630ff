// Resume analysis core: normalization, vocabulary matching, heuristic scoring,
// validate-and-default, and the pluggable analyzer backends.
// No module here talks to the network directly; the LLM backend receives an
// injected `LlmProvider`.

use thiserror::Error;

use crate::llm_client::LlmError;

pub mod analyzer;
pub mod assembler;
pub mod matcher;
pub mod normalize;
pub mod prompts;
pub mod sanitize;
pub mod scoring;
pub mod vocabulary;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Insufficient content: {length} characters after normalization, at least {minimum} required")]
    InsufficientContent { length: usize, minimum: usize },

    #[error("Malformed LLM response: {0}")]
    LlmResponseMalformed(String),

    #[error("LLM provider error: {0}")]
    LlmProvider(#[from] LlmError),
}
