// Job matching: compare a stored resume analysis against a job description.
// Results are keyed by (resume, description hash) and computed at most once.

pub mod handlers;
pub mod job_matcher;
pub mod prompts;
pub mod service;
pub mod store;
