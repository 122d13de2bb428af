//! Mock provider for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use eduquest_core::traits::{FeedbackGenerator, FeedbackRequest, FeedbackResponse};

use crate::error::FeedbackError;

/// A mock feedback generator for exercising the exam flow without real
/// API calls.
pub struct MockFeedback {
    response: Option<String>,
    call_count: AtomicU32,
    last_request: Mutex<Option<FeedbackRequest>>,
}

impl MockFeedback {
    /// A mock that always returns the same feedback text.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock whose every call fails with a network error.
    pub fn failing() -> Self {
        Self {
            response: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of calls made to this generator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last request received, if any.
    pub fn last_request(&self) -> Option<FeedbackRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackGenerator for MockFeedback {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &FeedbackRequest) -> anyhow::Result<FeedbackResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        match &self.response {
            Some(text) => Ok(FeedbackResponse {
                text: text.clone(),
                model: "mock-model".into(),
                latency_ms: 1,
            }),
            None => Err(FeedbackError::NetworkError("mock failure".into()).into()),
        }
    }
}
