//! NER resolution backends and language routing
//!
//! The resolvers here are lexical: capitalized-run candidates classified by
//! variant-specific organization cues and small location gazetteers. They
//! stand behind the same narrow contract a transformer NER model would, and
//! return spans measured against the exact text passed in.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AnonymizerError, Result};
use crate::processing::entity::Entity;

pub trait NerResolver: Send + Sync {
    fn variant(&self) -> NerVariant;

    /// Resolve entity spans in `text`. Spans are character offsets into the
    /// exact string passed here, not into any earlier or later text version.
    fn resolve(&self, text: &str) -> Result<Vec<Entity>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NerVariant {
    Turkish,
    English,
    Multi,
}

impl fmt::Display for NerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NerVariant::Turkish => "turkish",
            NerVariant::English => "english",
            NerVariant::Multi => "multi",
        };
        f.write_str(name)
    }
}

impl FromStr for NerVariant {
    type Err = AnonymizerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "turkish" => Ok(NerVariant::Turkish),
            "english" => Ok(NerVariant::English),
            "multi" => Ok(NerVariant::Multi),
            other => Err(AnonymizerError::Configuration(format!(
                "Unknown NER variant: '{}' (expected 'turkish', 'english' or 'multi')",
                other
            ))),
        }
    }
}

/// Language routing for NER model selection. This is a two-way branch, not
/// full multilingual support: Turkish text gets the Turkish-tuned variant,
/// everything else (including an unknown detection result) gets the general
/// English variant.
pub fn variant_for_language(code: &str) -> NerVariant {
    if code == "tr" {
        NerVariant::Turkish
    } else {
        NerVariant::English
    }
}

pub fn create_ner_resolver(variant: NerVariant) -> Box<dyn NerResolver> {
    debug!("Constructing NER resolver: {}", variant);
    Box::new(LexicalNerResolver::new(variant))
}

// Runs of one or more capitalized tokens within a line.
static CAP_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z][\w.&'-]*(?:[ \t]+[A-Z][\w.&'-]*)*").expect("Invalid capitalized-run regex")
});

const ENGLISH_ORG_CUES: &[&str] = &[
    "Inc", "Ltd", "LLC", "Corp", "GmbH", "University", "Institute", "College", "Technologies",
    "Technology", "Solutions", "Systems", "Group", "Bank", "Labs", "Consulting", "Experts",
    "Software", "Agency",
];

// Stored in accent-stripped form, matching the normalized text the pipeline
// feeds in. Dotless 'ı' survives accent stripping, so cues either keep it
// ("Yazılım") or stop before it ("Bankas" covers "Bankası").
const TURKISH_ORG_CUES: &[&str] = &[
    "A.S", "Ltd", "Sti", "Universitesi", "Universite", "Holding", "Bankas", "Teknoloji",
    "Grubu", "Akademi", "Yazılım",
];

const ENGLISH_ORG_NAMES: &[&str] = &[
    "Google", "Microsoft", "Amazon", "Apple", "IBM", "Oracle", "Intel", "Netflix", "Initech",
];

const TURKISH_ORG_NAMES: &[&str] = &[
    "Turkcell", "Vodafone", "Garanti", "Akbank", "Aselsan", "Havelsan",
];

const ENGLISH_LOCATIONS: &[&str] = &[
    "New York", "San Francisco", "Los Angeles", "London", "Berlin", "Paris", "Amsterdam",
    "Boston", "Chicago", "Seattle",
];

const TURKISH_LOCATIONS: &[&str] = &[
    "Istanbul", "Ankara", "Izmir", "Bursa", "Antalya", "Eskisehir",
];

pub struct LexicalNerResolver {
    variant: NerVariant,
    org_cues: HashSet<&'static str>,
    org_names: HashSet<&'static str>,
    locations: HashSet<&'static str>,
}

impl LexicalNerResolver {
    pub fn new(variant: NerVariant) -> Self {
        let (cues, names, locations): (Vec<&str>, Vec<&str>, Vec<&str>) = match variant {
            NerVariant::English => (
                ENGLISH_ORG_CUES.to_vec(),
                ENGLISH_ORG_NAMES.to_vec(),
                ENGLISH_LOCATIONS.to_vec(),
            ),
            NerVariant::Turkish => (
                TURKISH_ORG_CUES.to_vec(),
                TURKISH_ORG_NAMES.to_vec(),
                TURKISH_LOCATIONS.to_vec(),
            ),
            NerVariant::Multi => (
                [ENGLISH_ORG_CUES, TURKISH_ORG_CUES].concat(),
                [ENGLISH_ORG_NAMES, TURKISH_ORG_NAMES].concat(),
                [ENGLISH_LOCATIONS, TURKISH_LOCATIONS].concat(),
            ),
        };
        Self {
            variant,
            org_cues: cues.into_iter().collect(),
            org_names: names.into_iter().collect(),
            locations: locations.into_iter().collect(),
        }
    }

    fn classify(&self, surface: &str) -> Option<&'static str> {
        let trimmed = surface.trim_end_matches(|c| c == '.' || c == ',');
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        let has_org_cue = tokens.iter().any(|token| {
            let token = token.trim_end_matches(|c| c == '.' || c == ',');
            self.org_cues.iter().any(|cue| token.starts_with(cue))
        });
        if has_org_cue || tokens.iter().any(|t| self.org_names.contains(*t)) {
            return Some("ORG");
        }
        if self.locations.contains(trimmed) || (tokens.len() == 1 && self.locations.contains(tokens[0])) {
            return Some("LOC");
        }
        // A lone capitalized token with no gazetteer hit is far more likely
        // to be a sentence start than a name; only multi-token runs become
        // person candidates.
        if tokens.len() >= 2 {
            return Some("PER");
        }
        None
    }
}

impl NerResolver for LexicalNerResolver {
    fn variant(&self) -> NerVariant {
        self.variant
    }

    fn resolve(&self, text: &str) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();
        for m in CAP_RUN_RE.find_iter(text) {
            let surface = m.as_str();
            if let Some(label) = self.classify(surface) {
                let start = text[..m.start()].chars().count();
                let end = start + surface.chars().count();
                entities.push(Entity::new(start, end, label, surface));
            }
        }
        debug!("Resolved {} entities with {} variant", entities.len(), self.variant);
        Ok(entities)
    }
}
