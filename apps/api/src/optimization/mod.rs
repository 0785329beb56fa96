// Resume optimization: prompt construction and strict result parsing.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod optimizer;
pub mod prompts;

pub use optimizer::{optimize, OptimizationError, OptimizeError};
