// src/resolver/mod.rs
//! Reply resolver: turns raw user text into exactly one reply string.
//!
//! Order in rule mode:
//! 1) Normalize; empty input gets the greeting
//! 2) Ordered topic table (first match wins)
//! 3) Detector: brand, then region
//! 4) Fixed fallback
//!
//! Generative mode forwards the text with knowledge context and detection
//! hints to a `TextGenerator`. Every failure is absorbed into a fixed reply.

pub mod topics;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::context::build_context;
use crate::detect::{detect_brand, detect_hints, detect_region, DetectionHints};
use crate::generator::{ChatMessage, GenerationError, GenerationRequest, TextGenerator};
use crate::knowledge::KnowledgeBase;
use crate::metrics;
use crate::render::{render_brand, render_region};
use crate::telemetry::anon_hash;

use self::topics::{match_topic, TOPIC_RULES};

pub const ASSISTANT_NAME: &str = "Archana";

pub const GREETING_REPLY: &str = "Namaste, I am Archana, your AI assistant for Paramount Project \
     Endeavors Pvt. Ltd. How can I help you today?";

pub const FALLBACK_REPLY: &str = "Archana here. I may not have full context for that question, \
     but you can ask me about Paramount's services, rollout capabilities, focus sectors, project \
     examples, city coverage or how to get in touch for a new project.";

pub const EMPTY_GENERATION_REPLY: &str = "Sorry, I could not generate an answer to that just now. \
     Please try rephrasing your question.";

pub const UNAVAILABLE_REPLY: &str = "Sorry, Archana is temporarily unavailable. Please try again \
     in a moment or reach the team through the contact form.";

pub const SYSTEM_INSTRUCTION: &str = "You are Archana, an AI assistant for Paramount Project \
     Endeavors Pvt. Ltd.\nYou answer concisely and professionally.\nIf a question is about \
     construction, fit-outs, rollouts, or the company, answer in detail using the company \
     knowledge provided.\nIf you don't know, say you are not sure instead of making things up.";

pub const NO_DETECTION_HINT: &str = "No specific brand or region was detected in the question.";

/// Deployment-time reply strategy selector. The config file and the
/// environment share one parser (`FromStr`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Mode {
    #[default]
    Rule,
    Generative,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Rule => "rule",
            Mode::Generative => "generative",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rule" | "rules" => Ok(Mode::Rule),
            "generative" | "llm" => Ok(Mode::Generative),
            other => anyhow::bail!("unknown assistant mode: {other}"),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fixed parameters of a generative call.
#[derive(Clone)]
pub struct GenerativeSettings {
    pub generator: Arc<dyn TextGenerator>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl fmt::Debug for GenerativeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerativeSettings")
            .field("generator", &self.generator.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Strategy {
    Rule,
    Generative(GenerativeSettings),
}

/// How a reply was produced (logs + metrics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Greeting,
    Topic(&'static str),
    Brand,
    Region,
    Fallback,
    Generated,
    Empty,
    Unavailable,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Greeting => "greeting",
            Outcome::Topic(_) => "topic",
            Outcome::Brand => "brand",
            Outcome::Region => "region",
            Outcome::Fallback => "fallback",
            Outcome::Generated => "generated",
            Outcome::Empty => "empty",
            Outcome::Unavailable => "unavailable",
        }
    }
}

/// Owns the knowledge base and the context built from it. Immutable after
/// construction, so one instance serves concurrent requests without locks.
#[derive(Debug)]
pub struct ReplyResolver {
    kb: Arc<KnowledgeBase>,
    context: String,
    strategy: Strategy,
}

impl ReplyResolver {
    pub fn new(kb: Arc<KnowledgeBase>, strategy: Strategy) -> Self {
        let context = build_context(&kb);
        Self {
            kb,
            context,
            strategy,
        }
    }

    pub fn rule_based(kb: Arc<KnowledgeBase>) -> Self {
        Self::new(kb, Strategy::Rule)
    }

    pub fn generative(kb: Arc<KnowledgeBase>, settings: GenerativeSettings) -> Self {
        Self::new(kb, Strategy::Generative(settings))
    }

    pub fn mode(&self) -> Mode {
        match self.strategy {
            Strategy::Rule => Mode::Rule,
            Strategy::Generative(_) => Mode::Generative,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Cached knowledge context sent with every generative call.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Resolve one message. Never fails.
    pub async fn resolve(&self, message: &str) -> String {
        let started = Instant::now();
        let text = normalize(message);
        metrics::record_request(self.mode());

        let (reply, outcome) = if text.is_empty() {
            (GREETING_REPLY.to_string(), Outcome::Greeting)
        } else {
            match &self.strategy {
                Strategy::Rule => self.resolve_rules(&text),
                Strategy::Generative(settings) => {
                    self.resolve_generative(settings, &text, message).await
                }
            }
        };

        metrics::record_reply(outcome);
        let topic = match outcome {
            Outcome::Topic(name) => name,
            _ => "-",
        };
        info!(
            target: "archana",
            id = %anon_hash(&text),
            mode = self.mode().as_str(),
            outcome = outcome.label(),
            topic,
            len = text.chars().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "reply resolved"
        );
        reply
    }

    /// Rule-mode cascade over already normalized text.
    pub fn resolve_rules(&self, text: &str) -> (String, Outcome) {
        if text.is_empty() {
            return (GREETING_REPLY.to_string(), Outcome::Greeting);
        }

        if let Some((rule, reply)) = match_topic(TOPIC_RULES, &self.kb, text) {
            return (reply, Outcome::Topic(rule.name));
        }

        if let Some(key) = detect_brand(&self.kb, text) {
            let reply = render_brand(&self.kb, key);
            if !reply.is_empty() {
                return (reply, Outcome::Brand);
            }
        }

        if let Some(key) = detect_region(&self.kb, text) {
            let reply = render_region(&self.kb, key);
            if !reply.is_empty() {
                return (reply, Outcome::Region);
            }
        }

        (FALLBACK_REPLY.to_string(), Outcome::Fallback)
    }

    /// Message list for one generative call, in the fixed order:
    /// instruction, knowledge context, hints, user text.
    pub fn build_request(
        &self,
        settings: &GenerativeSettings,
        text: &str,
        raw: &str,
    ) -> GenerationRequest {
        let hints = detect_hints(&self.kb, text);
        GenerationRequest {
            model: settings.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::system(format!("Company knowledge:\n{}", self.context)),
                ChatMessage::system(hint_line(&hints)),
                ChatMessage::user(raw.trim()),
            ],
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    async fn resolve_generative(
        &self,
        settings: &GenerativeSettings,
        text: &str,
        raw: &str,
    ) -> (String, Outcome) {
        let request = self.build_request(settings, text, raw);
        let started = Instant::now();

        let call = settings.generator.generate(&request);
        let result = match tokio::time::timeout(settings.timeout, call).await {
            Ok(inner) => inner,
            Err(_) => Err(GenerationError::Timeout),
        };
        metrics::record_generation_ms(started.elapsed().as_millis() as f64);

        match result {
            Ok(output) => {
                let output = output.trim();
                if output.is_empty() {
                    debug!(target: "archana", provider = settings.generator.name(), "empty generation");
                    (EMPTY_GENERATION_REPLY.to_string(), Outcome::Empty)
                } else {
                    (output.to_string(), Outcome::Generated)
                }
            }
            Err(e) => {
                warn!(
                    target: "archana",
                    provider = settings.generator.name(),
                    kind = e.kind(),
                    error = %e,
                    "generation failed"
                );
                (UNAVAILABLE_REPLY.to_string(), Outcome::Unavailable)
            }
        }
    }
}

/// Trim, lowercase, collapse internal whitespace.
pub fn normalize(input: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    re_ws.replace_all(input.trim(), " ").to_lowercase()
}

/// Hint sentence passed to the generator.
pub fn hint_line(hints: &DetectionHints) -> String {
    if hints.is_empty() {
        return NO_DETECTION_HINT.to_string();
    }
    let mut parts = Vec::with_capacity(2);
    if let Some(brand) = &hints.brand {
        parts.push(format!("brand: {brand}"));
    }
    if let Some(region) = &hints.region {
        parts.push(format!("region: {region}"));
    }
    format!("Detected hints: {}.", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MockGenerator;

    fn kb() -> Arc<KnowledgeBase> {
        Arc::new(KnowledgeBase::builtin().unwrap())
    }

    #[test]
    fn normalize_trims_lowercases_and_collapses() {
        assert_eq!(normalize("  Tell  me\tabout\nKFC  "), "tell me about kfc");
        assert_eq!(normalize(" \t\n "), "");
    }

    #[test]
    fn hint_line_formats() {
        assert_eq!(hint_line(&DetectionHints::default()), NO_DETECTION_HINT);
        let hints = DetectionHints {
            brand: Some("kfc".into()),
            region: Some("west".into()),
        };
        assert_eq!(hint_line(&hints), "Detected hints: brand: kfc, region: west.");
        let only_region = DetectionHints {
            brand: None,
            region: Some("north".into()),
        };
        assert_eq!(hint_line(&only_region), "Detected hints: region: north.");
    }

    #[test]
    fn mode_parses_and_displays() {
        assert_eq!("Rule".parse::<Mode>().unwrap(), Mode::Rule);
        assert_eq!(" generative ".parse::<Mode>().unwrap(), Mode::Generative);
        assert!("chaos".parse::<Mode>().is_err());
        assert_eq!(Mode::Generative.to_string(), "generative");
    }

    #[test]
    fn rule_cascade_outcomes() {
        let r = ReplyResolver::rule_based(kb());
        assert_eq!(r.resolve_rules("").1, Outcome::Greeting);
        assert_eq!(r.resolve_rules("hotel contact").1, Outcome::Topic("hospitality"));
        assert_eq!(r.resolve_rules("tell me about kfc").1, Outcome::Brand);
        assert_eq!(r.resolve_rules("projects in pune").1, Outcome::Region);
        assert_eq!(r.resolve_rules("quantum physics").1, Outcome::Fallback);
    }

    #[test]
    fn brand_takes_precedence_over_region() {
        let r = ReplyResolver::rule_based(kb());
        let (reply, outcome) = r.resolve_rules("kfc in pune");
        assert_eq!(outcome, Outcome::Brand);
        assert_eq!(reply, render_brand(r.knowledge(), "kfc"));
    }

    #[test]
    fn request_carries_four_ordered_messages() {
        let settings = GenerativeSettings {
            generator: Arc::new(MockGenerator { fixed: "ok".into() }),
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            max_tokens: 400,
            timeout: Duration::from_secs(5),
        };
        let r = ReplyResolver::generative(kb(), settings.clone());
        assert_eq!(r.mode(), Mode::Generative);

        let req = r.build_request(&settings, "tell me about kfc", "  Tell me about KFC ");
        assert_eq!(req.messages.len(), 4);
        assert_eq!(req.messages[0].content, SYSTEM_INSTRUCTION);
        assert!(req.messages[1].content.ends_with(r.context()));
        assert!(req.messages[2].content.contains("brand: kfc"));
        assert_eq!(req.messages[3].content, "Tell me about KFC");
        assert_eq!(req.messages[3].role, crate::generator::Role::User);
        assert_eq!(req.max_tokens, 400);
    }

    #[test]
    fn context_is_built_once_at_construction() {
        let kb = kb();
        let r = ReplyResolver::rule_based(kb.clone());
        assert_eq!(r.context(), build_context(&kb));
    }
}
