// src/render.rs
//! Paragraph rendering for knowledge-base entries.
//! Unknown keys render as an empty string; callers treat that as "nothing to say".

use crate::knowledge::KnowledgeBase;

/// Maximum cities named in a region reply.
pub const MAX_REGION_CITIES: usize = 8;

pub fn render_sector(kb: &KnowledgeBase, key: &str) -> String {
    let Some(sector) = kb.sector(key) else {
        return String::new();
    };
    let description = sector.description.trim_end_matches('.');
    if sector.examples.is_empty() {
        return format!("{description}.");
    }
    format!(
        "{description}. Examples include: {}.",
        sector.examples.join("; ")
    )
}

pub fn render_brand(kb: &KnowledgeBase, key: &str) -> String {
    let Some(brand) = kb.brand(key) else {
        return String::new();
    };
    // Sector references are validated at load time.
    let sector = kb
        .sector(&brand.sector)
        .map(|s| s.description.trim_end_matches('.'))
        .unwrap_or_default();

    format!(
        "Paramount has delivered {name} projects with a typical area of {area}. \
         Footprint: {footprint}. This work sits in our {sector_key} portfolio: {sector}.",
        name = brand.display_name(),
        area = brand.typical_area.trim_end_matches('.'),
        footprint = brand.footprint.trim_end_matches('.'),
        sector_key = brand.sector,
        sector = sector,
    )
}

pub fn render_region(kb: &KnowledgeBase, key: &str) -> String {
    let Some(region) = kb.region(key) else {
        return String::new();
    };
    if region.cities.is_empty() {
        return String::new();
    }
    let cities = region
        .cities
        .iter()
        .take(MAX_REGION_CITIES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "In the {} region, Paramount has executed projects in cities such as {}.",
        title_case(&region.key),
        cities
    )
}

pub fn render_team(kb: &KnowledgeBase) -> String {
    let mut parts: Vec<String> = kb
        .team()
        .iter()
        .map(|m| {
            format!(
                "{} ({}): {}.",
                m.name,
                m.role,
                m.background.trim_end_matches('.')
            )
        })
        .collect();
    if !kb.headcount_summary().is_empty() {
        parts.push(kb.headcount_summary().to_string());
    }
    if parts.is_empty() {
        return String::new();
    }
    format!("Paramount's leadership team: {}", parts.join(" "))
}

/// "west" -> "West", "north east" -> "North East".
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{Region, SectorEntry};

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin().unwrap()
    }

    #[test]
    fn sector_lists_examples_with_semicolons() {
        let out = render_sector(&kb(), "hospitality");
        assert!(out.starts_with("Hotel projects"));
        assert!(out.contains("Ginger Mumbai; Accor in Gujarat"));
        assert_eq!(render_sector(&kb(), "shipyards"), "");
    }

    #[test]
    fn brand_includes_area_footprint_and_sector() {
        let kb = kb();
        let out = render_brand(&kb, "kfc");
        assert!(out.contains("KFC"));
        assert!(out.contains("4,500 sq.ft."));
        assert!(out.contains("Nirala Bazaar"));
        assert!(out.contains("Quick-service and restaurant formats"));
        assert_eq!(render_brand(&kb, "unknown"), "");
    }

    #[test]
    fn region_caps_city_list() {
        let kb = kb();
        let out = render_region(&kb, "west");
        assert!(out.starts_with("In the West region"));
        assert!(out.contains("Mumbai"));
        let named = kb.region("west").unwrap().cities.iter().filter(|c| out.contains(c.as_str())).count();
        assert!(named <= MAX_REGION_CITIES);
        // Ninth city onwards is left out.
        assert!(!out.contains("Surat"));
        assert_eq!(render_region(&kb, "mars"), "");
    }

    #[test]
    fn region_without_cities_renders_nothing() {
        let kb = KnowledgeBase::new(
            vec![SectorEntry {
                key: "retail".into(),
                description: "d".into(),
                examples: vec![],
            }],
            vec![],
            vec![Region {
                key: "central".into(),
                cities: vec![],
            }],
            vec![],
            "",
        )
        .unwrap();
        assert_eq!(render_region(&kb, "central"), "");
        assert_eq!(render_team(&kb), "");
    }

    #[test]
    fn team_keeps_declared_order_and_headcount() {
        let out = render_team(&kb());
        let pradeep = out.find("Pradeep Singh").unwrap();
        let aalok = out.find("Aalok Mishra").unwrap();
        assert!(pradeep < aalok);
        assert!(out.ends_with("engineers and technicians."));
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("west"), "West");
        assert_eq!(title_case("north east"), "North East");
    }
}
