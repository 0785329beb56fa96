//! Payment collaborator.
//!
//! Default: `DemoPaymentProcessor`, which unlocks the download without moving
//! any money. A real processor implements `PaymentProcessor` and is swapped in
//! at startup; callers never change.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Processor-issued proof of a completed charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReceiptId(String);

impl ReceiptId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment declined: {0}")]
    Declined(String),
}

/// Carried in `AppState` as `Arc<dyn PaymentProcessor>`.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Charges `amount` (whole dollars) for `plan_id`.
    async fn charge(&self, plan_id: &str, amount: u32) -> Result<ReceiptId, PaymentError>;
}

/// Always succeeds. No card is charged.
pub struct DemoPaymentProcessor;

#[async_trait]
impl PaymentProcessor for DemoPaymentProcessor {
    async fn charge(&self, plan_id: &str, amount: u32) -> Result<ReceiptId, PaymentError> {
        let receipt = ReceiptId::new(format!("demo_{}", Uuid::new_v4().simple()));
        warn!(
            plan_id,
            amount,
            receipt = %receipt,
            "Demo payment accepted; no real charge was made"
        );
        Ok(receipt)
    }
}
