// src/detect.rs
//! Keyword detection over normalized input.
//!
//! Matching is plain substring search and the first hit in knowledge-base
//! order wins, so "kfc menu" resolves to `kfc` and table order decides ties.

use crate::knowledge::KnowledgeBase;

/// Per-request detection result, passed to the generator as a hint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionHints {
    pub brand: Option<String>,
    pub region: Option<String>,
}

impl DetectionHints {
    pub fn is_empty(&self) -> bool {
        self.brand.is_none() && self.region.is_none()
    }
}

/// First brand key (KB order) contained in `text`.
pub fn detect_brand<'kb>(kb: &'kb KnowledgeBase, text: &str) -> Option<&'kb str> {
    let text = text.to_lowercase();
    kb.brands()
        .iter()
        .find(|b| text.contains(b.key.as_str()))
        .map(|b| b.key.as_str())
}

/// First region whose key or any of its cities is contained in `text`.
pub fn detect_region<'kb>(kb: &'kb KnowledgeBase, text: &str) -> Option<&'kb str> {
    let text = text.to_lowercase();
    kb.regions()
        .iter()
        .find(|r| {
            text.contains(r.key.as_str())
                || r.cities
                    .iter()
                    .any(|c| !c.trim().is_empty() && text.contains(&c.trim().to_lowercase()))
        })
        .map(|r| r.key.as_str())
}

pub fn detect_hints(kb: &KnowledgeBase, text: &str) -> DetectionHints {
    DetectionHints {
        brand: detect_brand(kb, text).map(str::to_string),
        region: detect_region(kb, text).map(str::to_string),
    }
}
