use std::sync::Arc;

use crate::billing::PaymentProcessor;
use crate::export::DocumentExporter;
use crate::llm_client::TextGenerator;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Text-generation backend. Production: `LlmClient`.
    pub llm: Arc<dyn TextGenerator>,
    /// Payment collaborator. Production: `DemoPaymentProcessor` until a real processor lands.
    pub payments: Arc<dyn PaymentProcessor>,
    /// Export collaborator. Production: `SpoolExporter`.
    pub exporter: Arc<dyn DocumentExporter>,
}
