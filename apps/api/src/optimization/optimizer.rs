//! Resume Optimization: one draft in, one structured result out.
//!
//! Flow: validate draft → build prompt → one LLM call → join segments →
//!       strip fences → strict JSON parse → score range check.
//!
//! Every failure after validation collapses into `OptimizationError`, which
//! keeps the underlying cause for logs and tests.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{generate_json, LlmError, TextGenerator};
use crate::models::resume::{OptimizationResult, ResumeDraft, ValidationError};
use crate::optimization::prompts::{JOB_TAILORING_TEMPLATE, OPTIMIZE_PROMPT_TEMPLATE};

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Why an optimization failed. Never shown to the user; the user always
/// sees the same retry message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// Connection, TLS, or timeout failure before a status was received.
    Transport,
    /// The provider answered with a non-2xx status.
    Status(u16),
    /// The provider answered but no text survived fence stripping.
    EmptyContent,
    /// The envelope or the model's JSON did not match the expected shape.
    Parse,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Transport => f.write_str("transport"),
            FailureCause::Status(code) => write!(f, "status {code}"),
            FailureCause::EmptyContent => f.write_str("empty content"),
            FailureCause::Parse => f.write_str("parse"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Optimization failed. Please try again.")]
pub struct OptimizationError {
    cause: FailureCause,
    detail: String,
}

impl OptimizationError {
    pub fn new(cause: FailureCause, detail: impl Into<String>) -> Self {
        Self {
            cause,
            detail: detail.into(),
        }
    }

    pub fn cause(&self) -> FailureCause {
        self.cause
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<LlmError> for OptimizationError {
    fn from(err: LlmError) -> Self {
        let cause = match &err {
            LlmError::Http(_) => FailureCause::Transport,
            LlmError::Api { status, .. } => FailureCause::Status(*status),
            LlmError::Parse(_) => FailureCause::Parse,
            LlmError::EmptyContent => FailureCause::EmptyContent,
        };
        Self::new(cause, err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Failed(#[from] OptimizationError),
}

// ────────────────────────────────────────────────────────────────────────────
// Optimization
// ────────────────────────────────────────────────────────────────────────────

/// Optimizes a draft with exactly one call to `llm`.
///
/// A draft missing its name or experience is rejected before any call is made.
pub async fn optimize(
    draft: &ResumeDraft,
    llm: &dyn TextGenerator,
) -> Result<OptimizationResult, OptimizeError> {
    draft.validate()?;

    let prompt = build_optimization_prompt(draft);
    info!(
        tailored = draft.has_job_description(),
        prompt_chars = prompt.len(),
        "Requesting resume optimization"
    );

    let result: OptimizationResult = generate_json(llm, &prompt)
        .await
        .map_err(OptimizationError::from)?;

    if result.ats_score > OptimizationResult::MAX_ATS_SCORE {
        warn!("Model returned out-of-range atsScore={}", result.ats_score);
        return Err(OptimizationError::new(
            FailureCause::Parse,
            format!("atsScore {} is outside 0-100", result.ats_score),
        )
        .into());
    }

    info!(
        ats_score = result.ats_score,
        bullets = result.experience.len(),
        skills = result.skills.len(),
        "Resume optimized"
    );

    Ok(result)
}

/// Builds the single user-turn prompt embedding every draft field.
pub fn build_optimization_prompt(draft: &ResumeDraft) -> String {
    let job_block = if draft.has_job_description() {
        fill_template(
            JOB_TAILORING_TEMPLATE,
            &[("job_description", draft.job_description.as_str())],
        )
    } else {
        String::new()
    };

    fill_template(
        OPTIMIZE_PROMPT_TEMPLATE,
        &[
            ("name", draft.name.as_str()),
            ("email", draft.email.as_str()),
            ("phone", draft.phone.as_str()),
            ("summary", draft.summary.as_str()),
            ("experience", draft.experience.as_str()),
            ("education", draft.education.as_str()),
            ("skills", draft.skills.as_str()),
            ("job_block", job_block.as_str()),
            ("json_instruction", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Single-pass `{key}` substitution. Substituted text is never rescanned, so
/// user input containing `{skills}` stays literal; unknown braces pass through.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = vars.iter().find(|(key, _)| {
            tail[1..]
                .strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
