//! Session flows that involve a collaborator (LLM, payment, export).
//!
//! Each flow drives the synchronous transitions on `Session` and owns the
//! locking discipline around the collaborator call.

use std::sync::Arc;

use tracing::{info, warn};

use crate::billing::PaymentProcessor;
use crate::errors::AppError;
use crate::export::DocumentExporter;
use crate::llm_client::TextGenerator;
use crate::models::plan::find_plan;
use crate::models::resume::OptimizationResult;
use crate::optimization::{optimize, OptimizeError};
use crate::session::store::SessionHandle;
use crate::session::{Action, Session, SessionError, SessionView, View};

/// input → optimizing → preview | input.
///
/// The provider call and the completing transition run on their own task,
/// which owns the session handle. Dropping the request future (client
/// disconnect, proxy timeout) does not strand the session in `optimizing`.
/// The session lock is released while the provider is awaited; a concurrent
/// submit is rejected because the session sits in `optimizing`.
pub async fn submit_for_optimization(
    handle: SessionHandle,
    llm: Arc<dyn TextGenerator>,
) -> Result<SessionView, AppError> {
    let draft = {
        let mut session = handle.lock().await;
        match session.begin_optimization() {
            Err(SessionError::Validation(e)) => {
                info!(
                    session_id = %session.id(),
                    missing = ?e.missing,
                    "Draft incomplete, staying in input"
                );
                return Err(AppError::Validation(e.to_string()));
            }
            other => other?,
        }
    };

    let task = tokio::spawn(async move {
        let outcome = optimize(&draft, llm.as_ref()).await;
        let mut session = handle.lock().await;
        complete_optimization(&mut session, outcome)
    });

    task.await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Optimization task failed: {e}")))?
}

/// Resolves `optimizing` to `preview` or `input` for one optimize outcome.
/// This is the only place optimization failures are logged.
fn complete_optimization(
    session: &mut Session,
    outcome: Result<OptimizationResult, OptimizeError>,
) -> Result<SessionView, AppError> {
    let session_id = session.id();
    match outcome {
        Ok(result) => {
            let result = session.optimization_succeeded(result)?;
            info!(
                session_id = %session_id,
                ats_score = result.ats_score,
                "Session moved to preview"
            );
            Ok(session.snapshot())
        }
        Err(OptimizeError::Failed(e)) => {
            warn!(
                session_id = %session_id,
                cause = %e.cause(),
                "Optimization failed, returning session to input: {}",
                e.detail()
            );
            session.optimization_failed(e.to_string())?;
            Err(e.into())
        }
        // The snapshot passed validation in `begin_optimization`.
        Err(OptimizeError::Validation(e)) => {
            session.optimization_failed(e.to_string())?;
            Err(AppError::Internal(anyhow::anyhow!(
                "validated draft for session {session_id} was rejected by the optimizer: {e}"
            )))
        }
    }
}

/// preview → final, after the payment collaborator accepts the charge.
///
/// A declined payment leaves the session in `preview`.
pub async fn purchase_plan(
    handle: &SessionHandle,
    plan_id: &str,
    payments: &dyn PaymentProcessor,
) -> Result<SessionView, AppError> {
    let plan = find_plan(plan_id).ok_or_else(|| AppError::PlanNotFound(plan_id.to_string()))?;

    let mut session = handle.lock().await;
    session.ensure_view(View::Preview, Action::SelectPlan)?;

    let receipt = payments.charge(plan.id, plan.price).await?;
    session.select_plan(plan.id, Some(receipt))?;

    info!(session_id = %session.id(), plan_id = plan.id, "Session moved to final");
    Ok(session.snapshot())
}

/// Hands the printable document to the export collaborator. `final` only.
pub async fn export_document(
    handle: &SessionHandle,
    exporter: Arc<dyn DocumentExporter>,
) -> Result<(), AppError> {
    let markup = handle.lock().await.printable_document()?;

    tokio::task::spawn_blocking(move || exporter.render_and_print(&markup))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Export task failed: {e}")))
}
