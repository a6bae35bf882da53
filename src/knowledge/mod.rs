// src/knowledge/mod.rs
//! Company knowledge base: sectors, brands, regions and the team.
//!
//! Loaded once at startup (bundled `knowledge_base.json` or a file override),
//! validated, then shared read-only behind an `Arc` for the process lifetime.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Bundled knowledge file, compiled into the binary.
const BUILTIN_KNOWLEDGE: &str = include_str!("../../knowledge_base.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorEntry {
    pub key: String,
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandEntry {
    /// Lowercase match key, e.g. "kfc", "burger king".
    pub key: String,
    /// Display name; falls back to the key when absent.
    #[serde(default)]
    pub name: String,
    /// Foreign key into the sector table.
    pub sector: String,
    pub typical_area: String,
    pub footprint: String,
}

impl BrandEntry {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.key
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub key: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub background: String,
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed knowledge data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("brand '{brand}' references unknown sector '{sector}'")]
    UnknownSector { brand: String, sector: String },

    #[error("duplicate {kind} key '{key}'")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("empty {kind} key")]
    EmptyKey { kind: &'static str },
}

/// On-disk layout of the knowledge file.
#[derive(Debug, Deserialize)]
struct RawKnowledge {
    #[serde(default)]
    sectors: Vec<SectorEntry>,
    #[serde(default)]
    brands: Vec<BrandEntry>,
    #[serde(default)]
    regions: Vec<Region>,
    #[serde(default)]
    team: Vec<TeamMember>,
    #[serde(default)]
    headcount_summary: String,
}

/// Immutable, validated knowledge base. Iteration order is file order and is
/// relied upon by detection and context building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    sectors: Vec<SectorEntry>,
    brands: Vec<BrandEntry>,
    regions: Vec<Region>,
    team: Vec<TeamMember>,
    headcount_summary: String,
}

impl KnowledgeBase {
    /// Build and validate. Keys (and brand sector references) are lowercased
    /// so they compare directly against normalized input.
    pub fn new(
        mut sectors: Vec<SectorEntry>,
        mut brands: Vec<BrandEntry>,
        mut regions: Vec<Region>,
        team: Vec<TeamMember>,
        headcount_summary: impl Into<String>,
    ) -> Result<Self, KnowledgeError> {
        for s in sectors.iter_mut() {
            s.key = normalize_key(&s.key);
        }
        for b in brands.iter_mut() {
            b.key = normalize_key(&b.key);
            b.sector = normalize_key(&b.sector);
        }
        for r in regions.iter_mut() {
            r.key = normalize_key(&r.key);
        }

        ensure_unique("sector", sectors.iter().map(|s| s.key.as_str()))?;
        ensure_unique("brand", brands.iter().map(|b| b.key.as_str()))?;
        ensure_unique("region", regions.iter().map(|r| r.key.as_str()))?;

        for b in &brands {
            if !sectors.iter().any(|s| s.key == b.sector) {
                return Err(KnowledgeError::UnknownSector {
                    brand: b.key.clone(),
                    sector: b.sector.clone(),
                });
            }
        }

        Ok(Self {
            sectors,
            brands,
            regions,
            team,
            headcount_summary: headcount_summary.into().trim().to_string(),
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, KnowledgeError> {
        let parsed: RawKnowledge = serde_json::from_str(raw)?;
        Self::new(
            parsed.sectors,
            parsed.brands,
            parsed.regions,
            parsed.team,
            parsed.headcount_summary,
        )
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    /// The knowledge base compiled into the binary.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_json_str(BUILTIN_KNOWLEDGE)
    }

    pub fn sectors(&self) -> &[SectorEntry] {
        &self.sectors
    }

    pub fn brands(&self) -> &[BrandEntry] {
        &self.brands
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn team(&self) -> &[TeamMember] {
        &self.team
    }

    pub fn headcount_summary(&self) -> &str {
        &self.headcount_summary
    }

    pub fn sector(&self, key: &str) -> Option<&SectorEntry> {
        self.sectors.iter().find(|s| s.key == key)
    }

    pub fn brand(&self, key: &str) -> Option<&BrandEntry> {
        self.brands.iter().find(|b| b.key == key)
    }

    pub fn region(&self, key: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.key == key)
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

fn ensure_unique<'a>(
    kind: &'static str,
    keys: impl Iterator<Item = &'a str>,
) -> Result<(), KnowledgeError> {
    let mut seen = HashSet::new();
    for key in keys {
        if key.is_empty() {
            return Err(KnowledgeError::EmptyKey { kind });
        }
        if !seen.insert(key) {
            return Err(KnowledgeError::DuplicateKey {
                kind,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}
