//! Ordered topic table for rule-mode replies.
//!
//! Conditions are checks over the normalized input:
//! - `any_contains`: match if ANY of phrases appears as a substring
//! - `any_word`: match if ANY of words appears as a whole word
//! - `all_contains`: match if ALL of phrases appear
//! - `not_contains`: match if NONE of phrases appear
//!
//! `any_contains` and `any_word` together form one "any" group. Short tokens
//! ("hi", "hey", "cin") go in `any_word` so "kochi", "they" and "cinepolis"
//! do not trip them.
//!
//! First matching rule wins. The phrases overlap ("hotel contact" hits both
//! hospitality and contact), so the position of a rule in `TOPIC_RULES` is
//! its priority. Moving a rule changes behaviour.

use crate::context::COMPANY_NAME;
use crate::knowledge::KnowledgeBase;
use crate::render::{render_sector, title_case, MAX_REGION_CITIES};

#[derive(Debug, Clone, Copy, Default)]
pub struct When {
    pub any_contains: &'static [&'static str],
    pub any_word: &'static [&'static str],
    pub all_contains: &'static [&'static str],
    pub not_contains: &'static [&'static str],
}

impl When {
    pub const fn any(phrases: &'static [&'static str]) -> Self {
        Self {
            any_contains: phrases,
            any_word: &[],
            all_contains: &[],
            not_contains: &[],
        }
    }

    /// Adds whole-word alternatives to the "any" group.
    pub const fn or_words(self, words: &'static [&'static str]) -> Self {
        Self {
            any_word: words,
            ..self
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        let has_any = !self.any_contains.is_empty() || !self.any_word.is_empty();
        if !has_any && self.all_contains.is_empty() {
            return false;
        }
        if has_any
            && !self.any_contains.iter().any(|p| text.contains(p))
            && !self.any_word.iter().any(|w| contains_word(text, w))
        {
            return false;
        }
        if !self.all_contains.iter().all(|p| text.contains(p)) {
            return false;
        }
        !self.not_contains.iter().any(|p| text.contains(p))
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric()).any(|w| w == word)
}

/// What a matched topic answers with.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Fixed(&'static str),
    /// Rendered sector paragraph.
    Sector(&'static str),
    Team,
    /// Overview of every region and its lead cities.
    Regions,
    /// Names of every brand in the knowledge base.
    Brands,
}

impl Reply {
    /// Render against the knowledge base. Empty means "nothing to say".
    pub fn render(&self, kb: &KnowledgeBase) -> String {
        match self {
            Reply::Fixed(text) => (*text).to_string(),
            Reply::Sector(key) => render_sector(kb, key),
            Reply::Team => crate::render::render_team(kb),
            Reply::Regions => render_regions_overview(kb),
            Reply::Brands => render_brands_overview(kb),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TopicRule {
    pub name: &'static str,
    pub when: When,
    pub reply: Reply,
}

/// First rule whose condition holds and whose reply is non-empty.
pub fn match_topic(
    rules: &'static [TopicRule],
    kb: &KnowledgeBase,
    text: &str,
) -> Option<(&'static TopicRule, String)> {
    rules.iter().find_map(|rule| {
        if !rule.when.matches(text) {
            return None;
        }
        let reply = rule.reply.render(kb);
        if reply.is_empty() {
            None
        } else {
            Some((rule, reply))
        }
    })
}

fn render_regions_overview(kb: &KnowledgeBase) -> String {
    let regions: Vec<String> = kb
        .regions()
        .iter()
        .filter(|r| !r.cities.is_empty())
        .map(|r| {
            let cities: Vec<&str> = r
                .cities
                .iter()
                .take(MAX_REGION_CITIES)
                .map(String::as_str)
                .collect();
            format!("{} ({})", title_case(&r.key), cities.join(", "))
        })
        .collect();
    if regions.is_empty() {
        return String::new();
    }
    format!(
        "Paramount manages projects across India: {}. The interactive map and clients \
         directory on the website show detailed city-wise markers by brand.",
        regions.join("; ")
    )
}

fn render_brands_overview(kb: &KnowledgeBase) -> String {
    let names: Vec<&str> = kb.brands().iter().map(|b| b.display_name()).collect();
    if names.is_empty() {
        return String::new();
    }
    format!(
        "{COMPANY_NAME} has delivered projects for brands such as {}, along with hotel \
         chains, corporate offices and residential clients.",
        names.join(", ")
    )
}

pub const HELLO_REPLY: &str = "Hello, this is Archana from Paramount Project Endeavors Pvt. Ltd. \
     How can I support your project today?";

pub static TOPIC_RULES: &[TopicRule] = &[
    // Greetings / small talk
    TopicRule {
        name: "greeting",
        when: When::any(&["hello", "good morning", "good evening", "namaste"])
            .or_words(&["hi", "hey"]),
        reply: Reply::Fixed(HELLO_REPLY),
    },
    TopicRule {
        name: "identity",
        when: When::any(&["who are you", "what are you", "archana"]),
        reply: Reply::Fixed(
            "I am Archana, an AI assistant for Paramount Project Endeavors Pvt. Ltd., here to help \
             you understand our services, rollout capabilities and project footprint.",
        ),
    },
    // Company facts
    TopicRule {
        name: "legal-name",
        when: When::any(&["company name", "full name", "legal name"]),
        reply: Reply::Fixed(
            "The full legal name is Paramount Project Endeavors Private Limited (often written as \
             Paramount Project Endeavors Pvt. Ltd.).",
        ),
    },
    TopicRule {
        name: "registration",
        when: When::any(&["company identification", "registration number"]).or_words(&["cin"]),
        reply: Reply::Fixed(
            "Paramount Project Endeavors Private Limited is registered in India under CIN \
             U74999MH2013PTC240009.",
        ),
    },
    TopicRule {
        name: "experience",
        when: When {
            any_contains: &["incorporated", "founded", "started"],
            any_word: &[],
            all_contains: &["when"],
            not_contains: &[],
        },
        reply: Reply::Fixed(
            "Paramount Project Endeavors Pvt. Ltd. has over 10 years of practical experience, with \
             directors who each bring around 20 years of execution and site-management expertise.",
        ),
    },
    // Services
    TopicRule {
        name: "what-we-do",
        when: When::any(&["what do you do", "what does paramount", "what does the company do"]),
        reply: Reply::Fixed(
            "Paramount provides professional turnkey solutions for projects, combining technical \
             expertise and strong site management to take projects from concept and design through \
             to successful implementation. The focus is on quality interior execution and rollout \
             coordination across retail, QSR, hospitality, offices and residences.",
        ),
    },
    TopicRule {
        name: "services",
        when: When::any(&["services", "scope of work", "capabilities"]),
        reply: Reply::Fixed(
            "Key services include project designing, interior works, civil works, MEP works \
             including HVAC, and allied works. The team plans project flow, implements systems and \
             processes, coordinates multiple stakeholders, and manages end-to-end delivery within \
             agreed time, cost and quality parameters.",
        ),
    },
    TopicRule {
        name: "delivery-approach",
        when: When::any(&["strategy", "how do you deliver", "approach", "process"]),
        reply: Reply::Fixed(
            "The delivery strategy is to emphasise quality and service, using well-qualified \
             engineers and technicians, systematic coordination, and clear planning. Paramount \
             follows a professional approach from initial site meetings through project completion \
             so that targets stay on program and quality benchmarks are met.",
        ),
    },
    // Sectors
    TopicRule {
        name: "sectors",
        when: When::any(&["sectors", "verticals", "industry"]),
        reply: Reply::Fixed(
            "Paramount focuses on retail stores, quick-service restaurants (QSR), architectural \
             restaurant-bars, hotels, corporate offices and premium residences. The company also \
             executes multiplexes, fitness centres and other specialised interior projects.",
        ),
    },
    TopicRule {
        name: "retail",
        when: When::any(&["retail", "store", "croma", "mr diy", "booker"]),
        reply: Reply::Sector("retail"),
    },
    TopicRule {
        name: "qsr",
        when: When::any(&["qsr", "quick service", "restaurant", "food"]),
        reply: Reply::Sector("qsr"),
    },
    TopicRule {
        name: "hospitality",
        when: When::any(&["hospitality", "hotel", "ginger", "accor"]),
        reply: Reply::Sector("hospitality"),
    },
    TopicRule {
        name: "office",
        when: When::any(&["office", "corporate", "nokia", "trafigura"]),
        reply: Reply::Sector("office"),
    },
    TopicRule {
        name: "residence",
        when: When::any(&["residence", "bungalow", "apartment", "home interiors"]),
        reply: Reply::Sector("residence"),
    },
    // Explicit brand / region phrases
    TopicRule {
        name: "showcase",
        when: When::any(&["best works", "sample projects", "case studies", "portfolio"]),
        reply: Reply::Fixed(
            "Some highlighted works include Burma Burma, Talli Turmeric, Izumi, Family Tree \
             vegetarian restaurant, KFC at Nirala Bazaar in Aurangabad, and multiple Croma, Mr DIY \
             and QSR outlets. Typical restaurant areas range from about 2,000 to 4,500 sq.ft. with \
             build times around 60-70 days for individual outlets.",
        ),
    },
    TopicRule {
        name: "locations",
        when: When::any(&["locations", "cities", "where do you work", "pan india"]),
        reply: Reply::Regions,
    },
    TopicRule {
        name: "brands",
        when: When::any(&["brands", "clients", "who have you worked for"]),
        reply: Reply::Brands,
    },
    // Timeline / cost
    TopicRule {
        name: "timeline",
        when: When::any(&["timeline", "how long", "duration", "schedule"]),
        reply: Reply::Fixed(
            "Typical single-site restaurant or retail fit-outs are executed in roughly 60-70 days \
             depending on scope, approvals and site conditions. Larger hospitality or multi-floor \
             projects can run longer, but Paramount plans sequencing so civil, interiors and MEP \
             progress in parallel where possible.",
        ),
    },
    TopicRule {
        name: "cost",
        when: When::any(&["cost", "budget", "rates", "pricing", "price"]),
        reply: Reply::Fixed(
            "Exact pricing depends on city, scope, specifications and services. Paramount usually \
             works against drawings and BOQs or a defined scope, and can support value-engineering \
             while maintaining brand standards. For a directional estimate, it is best to share \
             basic drawings and a brief via the contact form.",
        ),
    },
    // Engagement
    TopicRule {
        name: "engagement",
        when: When::any(&["how do i start", "engage", "next step", "rfp", "tender"]),
        reply: Reply::Fixed(
            "You can start by sharing basic project details: location, approximate area, format \
             (retail, QSR, office, hotel or residence) and any available drawings or BOQ. Paramount \
             will then review scope, advise on timelines and sequencing, and propose a delivery \
             approach aligned to your rollout plan.",
        ),
    },
    // Team
    TopicRule {
        name: "team",
        when: When::any(&["directors", "management", "promoters", "team", "founder", "who runs"]),
        reply: Reply::Team,
    },
    // Contact
    TopicRule {
        name: "contact",
        when: When::any(&["contact", "phone", "email", "address", "reach you"]),
        reply: Reply::Fixed(
            "You can reach Paramount at the Mumbai head office: 13A, 3rd Floor, Ajay Apartments, \
             Next to Ruia Hall, Anand Road, Malad West, Mumbai 400064, phone +91-22-2881 2177, \
             mobile +91 9920479027, email info@ppepl.co.in. The North office is at Plot No. 70/60, \
             Upper Ground Floor, Mangolpuri, New Delhi 110085.",
        ),
    },
    // Website
    TopicRule {
        name: "website",
        when: When::any(&["website", "profile"]),
        reply: Reply::Fixed(
            "You can explore the full company profile and live project map at \
             https://esingh16.github.io/Paramount-Projects-Endeavors-Pvt.-Ltd/ and request the \
             detailed PDF profile for reference.",
        ),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin().unwrap()
    }

    fn topic(text: &str) -> Option<&'static str> {
        match_topic(TOPIC_RULES, &kb(), text).map(|(rule, _)| rule.name)
    }

    #[test]
    fn rule_names_are_unique() {
        let mut names: Vec<&str> = TOPIC_RULES.iter().map(|r| r.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), TOPIC_RULES.len());
    }

    #[test]
    fn declared_order_is_the_priority() {
        let expected = [
            "greeting",
            "identity",
            "legal-name",
            "registration",
            "experience",
            "what-we-do",
            "services",
            "delivery-approach",
            "sectors",
            "retail",
            "qsr",
            "hospitality",
            "office",
            "residence",
            "showcase",
            "locations",
            "brands",
            "timeline",
            "cost",
            "engagement",
            "team",
            "contact",
            "website",
        ];
        let actual: Vec<&str> = TOPIC_RULES.iter().map(|r| r.name).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn overlapping_phrases_resolve_to_earlier_rule() {
        assert_eq!(topic("hotel contact"), Some("hospitality"));
        assert_eq!(topic("what is your office address"), Some("office"));
        assert_eq!(topic("restaurant timeline"), Some("qsr"));
        assert_eq!(topic("how long does a tender take"), Some("timeline"));
        assert_eq!(topic("contact the team"), Some("team"));
    }

    #[test]
    fn all_contains_gate() {
        assert_eq!(topic("when was the company founded"), Some("experience"));
        // "founded" alone is not enough.
        assert_eq!(topic("founded in mumbai"), None);
    }

    #[test]
    fn cinepolis_is_not_mistaken_for_cin() {
        assert_eq!(topic("tell me about cinepolis"), None);
        assert_eq!(topic("what is your cin number"), Some("registration"));
        assert_eq!(topic("what is the cin?"), Some("registration"));
        assert_eq!(topic("company cin"), Some("registration"));
        assert_eq!(topic("cin of paramount"), Some("registration"));
        assert_eq!(topic("cin no please"), Some("registration"));
    }

    #[test]
    fn short_greetings_match_whole_words_only() {
        assert_eq!(topic("hi"), Some("greeting"));
        assert_eq!(topic("hey, are you there"), Some("greeting"));
        assert_eq!(topic("projects in kochi and chennai"), None);
        assert_eq!(topic("they build in pune"), None);
    }

    #[test]
    fn sector_rules_render_from_knowledge() {
        let (_, reply) = match_topic(TOPIC_RULES, &kb(), "any hotel work").unwrap();
        assert_eq!(reply, render_sector(&kb(), "hospitality"));
    }

    #[test]
    fn overviews_cover_knowledge() {
        let kb = kb();
        let regions = Reply::Regions.render(&kb);
        assert!(regions.contains("West (Mumbai"));
        assert!(regions.contains("East (Kolkata"));
        let brands = Reply::Brands.render(&kb);
        assert!(brands.contains("KFC, Burger King"));
    }

    #[test]
    fn empty_rendered_reply_falls_through() {
        static RULES: &[TopicRule] = &[
            TopicRule {
                name: "missing-sector",
                when: When::any(&["shipyard"]),
                reply: Reply::Sector("marine"),
            },
            TopicRule {
                name: "catch",
                when: When::any(&["shipyard"]),
                reply: Reply::Fixed("fallback topic"),
            },
        ];
        let (rule, reply) = match_topic(RULES, &kb(), "shipyard fit-out").unwrap();
        assert_eq!(rule.name, "catch");
        assert_eq!(reply, "fallback topic");
    }

    #[test]
    fn empty_condition_never_matches() {
        assert!(!When::default().matches("anything"));
    }
}
