//! The feedback-generator trait.
//!
//! This async trait is implemented by the `eduquest-feedback` crate for
//! real AI backends and by mocks in tests. The contract is best-effort:
//! one attempt per exam, and the caller downgrades any error to
//! [`FALLBACK_FEEDBACK`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The fixed title passed to the feedback generator.
pub const EXAM_TITLE: &str = "Ujian EduQuest";

/// Shown in place of AI feedback when the generation call fails for any
/// reason (network, auth, quota, malformed response, missing credential).
pub const FALLBACK_FEEDBACK: &str =
    "Analisis AI tidak tersedia saat ini. Bagus sekali sudah menyelesaikan ujian!";

/// Trait for AI backends that produce post-exam feedback.
#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate a short feedback message for an exam result.
    ///
    /// Must settle on the provider's own timeout; no retry policy.
    async fn generate(&self, request: &FeedbackRequest) -> anyhow::Result<FeedbackResponse>;
}

/// Request for one feedback message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// The student's score, 0..=100.
    pub score: u32,
    /// The scale the score is expressed against (100 in practice).
    pub total: u32,
    /// The exam title woven into the message.
    pub exam_title: String,
}

impl FeedbackRequest {
    pub fn new(score: u32, total: u32, exam_title: &str) -> Self {
        Self {
            score,
            total,
            exam_title: exam_title.to_string(),
        }
    }
}

/// Response from a feedback generation request.
#[derive(Debug, Clone)]
pub struct FeedbackResponse {
    /// The feedback text.
    pub text: String,
    /// Model that produced the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// The user prompt sent to every provider.
pub fn feedback_prompt(request: &FeedbackRequest) -> String {
    format!(
        "Berikan feedback singkat dan motivasi dalam Bahasa Indonesia untuk siswa \
         yang mendapatkan nilai {} dari {} pada ujian \"{}\".",
        request.score, request.total, request.exam_title
    )
}
