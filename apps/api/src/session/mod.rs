//! Resume session state machine.
//!
//! ```text
//! input      -> optimizing   (submit; draft must have name + experience)
//! optimizing -> preview      (optimization succeeded)
//! optimizing -> input        (optimization failed; draft kept)
//! preview    -> input        (revise; last result kept until replaced)
//! preview    -> final        (plan selected)
//! ```
//!
//! `final` is terminal apart from export. Every other (view, action) pair is
//! rejected with `SessionError::InvalidTransition` and changes nothing.

pub mod flow;
pub mod handlers;
pub mod store;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::billing::ReceiptId;
use crate::export::markup::{printable_page, render_resume};
use crate::models::plan::find_plan;
use crate::models::resume::{OptimizationResult, ResumeDraft, ResumeField, ValidationError};

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Input,
    Optimizing,
    Preview,
    Final,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Input => "input",
            View::Optimizing => "optimizing",
            View::Preview => "preview",
            View::Final => "final",
        };
        f.write_str(name)
    }
}

/// A user-initiated or completion-driven operation on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    EditDraft,
    Submit,
    CompleteOptimization,
    Revise,
    SelectPlan,
    Export,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::EditDraft => "edit the draft",
            Action::Submit => "submit for optimization",
            Action::CompleteOptimization => "complete an optimization",
            Action::Revise => "revise the draft",
            Action::SelectPlan => "select a plan",
            Action::Export => "export the resume",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot {action} in the {from} view")]
    InvalidTransition { from: View, action: Action },

    #[error("unknown plan '{0}'")]
    PlanNotFound(String),
}

/// One user's pass through the builder.
///
/// Invariants: `result` is set whenever `view` is `Preview` or `Final`;
/// `selected_plan` is set whenever `view` is `Final`.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    view: View,
    draft: ResumeDraft,
    result: Option<Arc<OptimizationResult>>,
    selected_plan: Option<String>,
    receipt: Option<ReceiptId>,
    notice: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Serializable snapshot returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub view: View,
    pub draft: ResumeDraft,
    pub result: Option<Arc<OptimizationResult>>,
    pub ats_score: Option<u8>,
    pub selected_plan: Option<String>,
    pub receipt_id: Option<ReceiptId>,
    pub notice: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            view: View::Input,
            draft: ResumeDraft::default(),
            result: None,
            selected_plan: None,
            receipt: None,
            notice: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn draft(&self) -> &ResumeDraft {
        &self.draft
    }

    /// Latest successful optimization, if any.
    pub fn result(&self) -> Option<&Arc<OptimizationResult>> {
        self.result.as_ref()
    }

    pub fn ats_score(&self) -> Option<u8> {
        self.result.as_ref().map(|r| r.ats_score)
    }

    pub fn selected_plan(&self) -> Option<&str> {
        self.selected_plan.as_deref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Fails with `InvalidTransition` unless the session is in `expected`.
    pub fn ensure_view(&self, expected: View, action: Action) -> Result<(), SessionError> {
        if self.view == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.view,
                action,
            })
        }
    }

    // ── Form data ───────────────────────────────────────────────────────────

    pub fn set_field(&mut self, field: ResumeField, value: String) -> Result<(), SessionError> {
        self.ensure_view(View::Input, Action::EditDraft)?;
        self.draft.set(field, value);
        self.touch();
        Ok(())
    }

    /// Applies several field updates in the order given.
    pub fn set_fields(
        &mut self,
        updates: impl IntoIterator<Item = (ResumeField, String)>,
    ) -> Result<(), SessionError> {
        self.ensure_view(View::Input, Action::EditDraft)?;
        for (field, value) in updates {
            self.draft.set(field, value);
        }
        self.touch();
        Ok(())
    }

    // ── Optimization ────────────────────────────────────────────────────────

    /// `input -> optimizing`. Returns the draft snapshot to optimize.
    ///
    /// A draft missing required fields stays in `input` with a notice.
    pub fn begin_optimization(&mut self) -> Result<ResumeDraft, SessionError> {
        self.ensure_view(View::Input, Action::Submit)?;
        if let Err(e) = self.draft.validate() {
            self.notice = Some(e.to_string());
            self.touch();
            return Err(e.into());
        }
        self.view = View::Optimizing;
        self.notice = None;
        self.touch();
        Ok(self.draft.clone())
    }

    /// `optimizing -> preview`. Replaces any previous result in one step.
    pub fn optimization_succeeded(
        &mut self,
        result: OptimizationResult,
    ) -> Result<Arc<OptimizationResult>, SessionError> {
        self.ensure_view(View::Optimizing, Action::CompleteOptimization)?;
        let result = Arc::new(result);
        self.result = Some(Arc::clone(&result));
        self.view = View::Preview;
        self.notice = None;
        self.touch();
        Ok(result)
    }

    /// `optimizing -> input`. Draft and any previous result are left alone.
    pub fn optimization_failed(&mut self, notice: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_view(View::Optimizing, Action::CompleteOptimization)?;
        self.view = View::Input;
        self.notice = Some(notice.into());
        self.touch();
        Ok(())
    }

    /// `preview -> input`, to edit and optimize again.
    pub fn revise(&mut self) -> Result<(), SessionError> {
        self.ensure_view(View::Preview, Action::Revise)?;
        self.view = View::Input;
        self.notice = None;
        self.touch();
        Ok(())
    }

    // ── Plan selection and export ───────────────────────────────────────────

    /// `preview -> final`. Pure transition; payment happens before this.
    pub fn select_plan(
        &mut self,
        plan_id: &str,
        receipt: Option<ReceiptId>,
    ) -> Result<(), SessionError> {
        self.ensure_view(View::Preview, Action::SelectPlan)?;
        let plan = find_plan(plan_id).ok_or_else(|| SessionError::PlanNotFound(plan_id.to_string()))?;
        self.selected_plan = Some(plan.id.to_string());
        self.receipt = receipt;
        self.view = View::Final;
        self.touch();
        Ok(())
    }

    /// The full printable page for the current result. `final` only.
    pub fn printable_document(&self) -> Result<String, SessionError> {
        self.ensure_view(View::Final, Action::Export)?;
        let result = self.result.as_ref().ok_or(SessionError::InvalidTransition {
            from: self.view,
            action: Action::Export,
        })?;
        let body = render_resume(&self.draft, result);
        Ok(printable_page(&self.draft.name, &body))
    }

    pub fn snapshot(&self) -> SessionView {
        SessionView {
            id: self.id,
            view: self.view,
            draft: self.draft.clone(),
            result: self.result.clone(),
            ats_score: self.ats_score(),
            selected_plan: self.selected_plan.clone(),
            receipt_id: self.receipt.clone(),
            notice: self.notice.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
