// src/config/assistant.rs
use anyhow::Context as _;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use std::{env, fs};
use tracing::{info, warn};

use crate::generator::{MockGenerator, OpenAiGenerator, TextGenerator, DEFAULT_API_BASE};
use crate::knowledge::{KnowledgeBase, KnowledgeError};
use crate::resolver::{GenerativeSettings, Mode, ReplyResolver};

// --- env defaults & names ---
pub const DEFAULT_ASSISTANT_CONFIG_PATH: &str = "config/assistant.toml";

pub const ENV_ASSISTANT_CONFIG_PATH: &str = "ASSISTANT_CONFIG_PATH";
pub const ENV_ASSISTANT_MODE: &str = "ASSISTANT_MODE";
pub const ENV_ASSISTANT_MODEL: &str = "ASSISTANT_MODEL";
pub const ENV_ASSISTANT_TIMEOUT_SECS: &str = "ASSISTANT_TIMEOUT_SECS";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// `AI_TEST_MODE=mock` swaps the real provider for a deterministic one.
pub const ENV_AI_TEST_MODE: &str = "AI_TEST_MODE";

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    400
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AssistantRoot {
    #[serde(default)]
    assistant: AssistantConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// "rule" | "generative" (also "rules" / "llm", any case)
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_model")]
    pub model: String,
    /// Kept low for near-deterministic answers. Clamped to 0.0..=1.0.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request-level bound on one generator call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Optional JSON knowledge file replacing the bundled one.
    #[serde(default)]
    pub knowledge_path: Option<PathBuf>,
    /// Resolved from `OPENAI_API_KEY`; never read from the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_base: default_api_base(),
            knowledge_path: None,
            api_key: None,
        }
    }
}

impl AssistantConfig {
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let root: AssistantRoot = toml::from_str(raw).context("invalid assistant config")?;
        let mut cfg = root.assistant;
        cfg.sanitize();
        Ok(cfg)
    }

    /// File (path from `ASSISTANT_CONFIG_PATH` or the default), then env
    /// overrides, then the API key. An absent or unreadable file means
    /// defaults; a malformed one is an error.
    pub fn from_env() -> anyhow::Result<Self> {
        let path = env::var(ENV_ASSISTANT_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ASSISTANT_CONFIG_PATH));

        let mut cfg = match fs::read_to_string(&path) {
            Ok(raw) => Self::from_toml_str(&raw)
                .with_context(|| format!("parsing {}", path.display()))?,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "assistant config unreadable, using defaults"
                );
                Self::default()
            }
        };

        cfg.apply_env_overrides()?;
        cfg.api_key = env::var(ENV_OPENAI_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty());

        // Safe diagnostics: only mode + model + key presence
        info!(
            "assistant cfg loaded: mode={}, model={}, key_present={}",
            cfg.mode,
            cfg.model,
            cfg.api_key.is_some()
        );
        if cfg.mode == Mode::Generative && cfg.api_key.is_none() {
            warn!("generative mode without {ENV_OPENAI_API_KEY}; replies will fall back");
        }
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Some(mode) = non_empty_env(ENV_ASSISTANT_MODE) {
            self.mode = mode.parse()?;
        }
        if let Some(model) = non_empty_env(ENV_ASSISTANT_MODEL) {
            self.model = model;
        }
        if let Some(secs) = non_empty_env(ENV_ASSISTANT_TIMEOUT_SECS) {
            self.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{ENV_ASSISTANT_TIMEOUT_SECS} must be an integer"))?;
        }
        self.sanitize();
        Ok(())
    }

    fn sanitize(&mut self) {
        if !self.temperature.is_finite() {
            self.temperature = default_temperature();
        }
        self.temperature = self.temperature.clamp(0.0, 1.0);
        if self.max_tokens == 0 {
            self.max_tokens = default_max_tokens();
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout_secs();
        }
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        if self.api_base.trim().is_empty() {
            self.api_base = default_api_base();
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn load_knowledge(&self) -> Result<KnowledgeBase, KnowledgeError> {
        match &self.knowledge_path {
            Some(path) => KnowledgeBase::load_from_file(path),
            None => KnowledgeBase::builtin(),
        }
    }

    /// Build the resolver for the configured mode. Knowledge errors are fatal.
    pub fn build_resolver(&self) -> anyhow::Result<ReplyResolver> {
        let kb = Arc::new(self.load_knowledge()?);
        match self.mode {
            Mode::Rule => Ok(ReplyResolver::rule_based(kb)),
            Mode::Generative => {
                let settings = GenerativeSettings {
                    generator: self.build_generator()?,
                    model: self.model.clone(),
                    temperature: self.temperature,
                    max_tokens: self.max_tokens,
                    timeout: self.timeout(),
                };
                Ok(ReplyResolver::generative(kb, settings))
            }
        }
    }

    fn build_generator(&self) -> anyhow::Result<Arc<dyn TextGenerator>> {
        if env::var(ENV_AI_TEST_MODE).map(|v| v == "mock").unwrap_or(false) {
            return Ok(Arc::new(MockGenerator {
                fixed: "Archana (mock): Paramount delivers turnkey fit-outs.".to_string(),
            }));
        }
        let client = OpenAiGenerator::new(self.api_key.clone(), &self.api_base, self.timeout())?;
        Ok(Arc::new(client))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
