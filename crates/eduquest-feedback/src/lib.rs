//! eduquest-feedback — AI feedback provider integrations.
//!
//! Implements the `FeedbackGenerator` trait for Gemini and Anthropic,
//! allowing eduquest to produce post-exam feedback from multiple AI
//! backends. Every provider makes exactly one attempt; the exam session
//! downgrades any failure to the fixed fallback message.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;

pub use config::{
    create_provider, default_generator, load_config, EduquestConfig, ProviderConfig, Unconfigured,
};
pub use error::FeedbackError;
