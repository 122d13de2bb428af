//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use eduquest_core::traits::{FeedbackGenerator, FeedbackRequest, FeedbackResponse};

use crate::anthropic::AnthropicProvider;
use crate::error::FeedbackError;
use crate::gemini::GeminiProvider;

/// Configuration for a single feedback provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure
/// in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    Anthropic {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
        }
    }
}

/// Top-level eduquest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EduquestConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used at exam completion.
    #[serde(default = "default_provider")]
    pub default_provider: String,
}

fn default_provider() -> String {
    "gemini".to_string()
}

impl Default for EduquestConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.clone(),
        },
        ProviderConfig::Anthropic {
            api_key,
            base_url,
            model,
        } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `eduquest.toml` in the current directory
/// 2. `~/.config/eduquest/config.toml`
///
/// Environment variable overrides: `EDUQUEST_GEMINI_KEY`,
/// `EDUQUEST_ANTHROPIC_KEY`.
pub fn load_config() -> Result<EduquestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<EduquestConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("eduquest.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<EduquestConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => EduquestConfig::default(),
    };

    // Apply env var overrides
    if let Ok(key) = std::env::var("EDUQUEST_GEMINI_KEY") {
        config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
                model: None,
            });
        if let Some(ProviderConfig::Gemini { api_key, .. }) = config.providers.get_mut("gemini") {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("EDUQUEST_ANTHROPIC_KEY") {
        config
            .providers
            .entry("anthropic".into())
            .or_insert(ProviderConfig::Anthropic {
                api_key: String::new(),
                base_url: None,
                model: None,
            });
        if let Some(ProviderConfig::Anthropic { api_key, .. }) =
            config.providers.get_mut("anthropic")
        {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("eduquest"))
}

/// Create a provider instance from its configuration.
///
/// An empty api key counts as not configured, so a missing credential
/// routes through the same fallback path as a failed call.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn FeedbackGenerator>> {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => {
            anyhow::ensure!(!api_key.trim().is_empty(), "gemini api key is empty");
            Ok(Box::new(GeminiProvider::new(
                api_key,
                base_url.clone(),
                model.clone(),
            )))
        }
        ProviderConfig::Anthropic {
            api_key,
            base_url,
            model,
        } => {
            anyhow::ensure!(!api_key.trim().is_empty(), "anthropic api key is empty");
            Ok(Box::new(AnthropicProvider::new(
                api_key,
                base_url.clone(),
                model.clone(),
            )))
        }
    }
}

/// Create the configured default provider, or [`Unconfigured`] when no
/// usable provider exists.
pub fn default_generator(config: &EduquestConfig) -> Box<dyn FeedbackGenerator> {
    match config.providers.get(&config.default_provider) {
        Some(provider_config) => match create_provider(provider_config) {
            Ok(provider) => provider,
            Err(e) => {
                tracing::warn!(
                    provider = config.default_provider.as_str(),
                    error = %e,
                    "feedback provider unusable, feedback will fall back"
                );
                Box::new(Unconfigured)
            }
        },
        None => {
            tracing::debug!(
                provider = config.default_provider.as_str(),
                "no feedback provider configured"
            );
            Box::new(Unconfigured)
        }
    }
}

/// Generator used when no provider is configured; every call fails, which
/// the exam session downgrades to the fallback message.
pub struct Unconfigured;

#[async_trait]
impl FeedbackGenerator for Unconfigured {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn generate(&self, _request: &FeedbackRequest) -> anyhow::Result<FeedbackResponse> {
        Err(FeedbackError::NotConfigured.into())
    }
}
