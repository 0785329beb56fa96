//! Test doubles shared by the unit tests of several modules.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::billing::{PaymentError, PaymentProcessor, ReceiptId};
use crate::export::DocumentExporter;
use crate::llm_client::{ContentBlock, LlmError, LlmResponse, TextGenerator};
use crate::models::resume::ResumeDraft;

/// Provider reply from the Jane Doe scenario.
pub const JANE_DOE_REPLY: &str = r#"{"summary":"...","experience":["Built X","Led Y"],"skills":["Go","SQL"],"atsScore":82,"improvements":["Add metrics"]}"#;

pub fn jane_doe() -> ResumeDraft {
    ResumeDraft {
        name: "Jane Doe".to_string(),
        experience: "Engineer at Acme (2019-2023)".to_string(),
        ..Default::default()
    }
}

pub fn text_reply(text: &str) -> Result<LlmResponse, LlmError> {
    Ok(LlmResponse {
        content: vec![ContentBlock {
            block_type: "text".to_string(),
            text: Some(text.to_string()),
        }],
        usage: None,
    })
}

pub fn failing_status(status: u16) -> Result<LlmResponse, LlmError> {
    Err(LlmError::Api {
        status,
        message: "scripted failure".to_string(),
    })
}

/// Replays queued replies in order and counts calls.
/// Running out of replies is reported as a 500 so a stray extra call fails loudly.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<LlmResponse, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| text_reply(t)).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| failing_status(500))
    }
}

/// Replies with one fixed text after a delay, like a provider that is slow to answer.
pub struct SlowGenerator {
    delay: Duration,
    reply: String,
    calls: AtomicUsize,
}

impl SlowGenerator {
    pub fn new(delay: Duration, reply: &str) -> Self {
        Self {
            delay,
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(&self, _prompt: &str) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        text_reply(&self.reply)
    }
}

/// Records every charge and declines when told to.
#[derive(Default)]
pub struct RecordingPayments {
    pub charges: Mutex<Vec<(String, u32)>>,
    pub decline: bool,
}

#[async_trait]
impl PaymentProcessor for RecordingPayments {
    async fn charge(&self, plan_id: &str, amount: u32) -> Result<ReceiptId, PaymentError> {
        self.charges
            .lock()
            .unwrap()
            .push((plan_id.to_string(), amount));
        if self.decline {
            return Err(PaymentError::Declined("card declined".to_string()));
        }
        Ok(ReceiptId::new(format!("test_{plan_id}")))
    }
}

/// Keeps every document handed to it.
#[derive(Clone, Default)]
pub struct RecordingExporter {
    pub documents: Arc<Mutex<Vec<String>>>,
}

impl DocumentExporter for RecordingExporter {
    fn render_and_print(&self, markup: &str) {
        self.documents.lock().unwrap().push(markup.to_string());
    }
}
