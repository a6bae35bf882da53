// src/context.rs
//! Flattens the knowledge base into the background context handed to the generator.
//! Output is byte-stable for identical knowledge, which keeps prompts reproducible.

use crate::knowledge::KnowledgeBase;
use std::fmt::Write as _;

pub const COMPANY_NAME: &str = "Paramount Project Endeavors Pvt. Ltd.";

pub fn build_context(kb: &KnowledgeBase) -> String {
    let mut out = String::with_capacity(4096);
    let _ = writeln!(out, "Company: {COMPANY_NAME}");

    let _ = writeln!(out, "Sectors:");
    for s in kb.sectors() {
        let _ = write!(out, "- {}: {}", s.key, s.description.trim_end_matches('.'));
        if !s.examples.is_empty() {
            let _ = write!(out, ". Examples: {}", s.examples.join("; "));
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Brands:");
    for b in kb.brands() {
        let _ = writeln!(
            out,
            "- {} (sector: {}): typical area {}; footprint: {}",
            b.display_name(),
            b.sector,
            b.typical_area,
            b.footprint
        );
    }

    let _ = writeln!(out, "Regions:");
    for r in kb.regions() {
        let _ = writeln!(out, "- {}: {}", r.key, r.cities.join(", "));
    }

    let _ = writeln!(out, "Team:");
    for m in kb.team() {
        let _ = writeln!(out, "- {}, {}: {}", m.name, m.role, m.background);
    }
    if !kb.headcount_summary().is_empty() {
        let _ = writeln!(out, "Headcount: {}", kb.headcount_summary());
    }

    out
}
