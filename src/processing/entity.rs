//! NER entity spans and the skill-vocabulary filter

use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

use crate::error::{AnonymizerError, Result};

/// Label assigned to organization entities by the NER backends.
pub const ORG_LABEL: &str = "ORG";

/// A half-open character span `[start, end)` into a specific text snapshot.
///
/// Spans are only meaningful against the exact string they were resolved
/// from; applying them to a differently-normalized or mutated text is an
/// error the pipeline ordering is designed to rule out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub surface: String,
}

impl Entity {
    pub fn new(start: usize, end: usize, label: impl Into<String>, surface: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            surface: surface.into(),
        }
    }
}

/// Case-insensitive substring matcher over the configured skill vocabulary.
///
/// Built once at startup and shared read-only across pipeline runs.
pub struct SkillMatcher {
    matcher: AhoCorasick,
}

impl SkillMatcher {
    pub fn new<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = terms.into_iter().map(|s| s.as_ref().to_string()).collect();
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| {
                AnonymizerError::Configuration(format!("Invalid skill vocabulary: {}", e))
            })?;
        Ok(Self { matcher })
    }

    pub fn matches(&self, surface: &str) -> bool {
        self.matcher.is_match(surface)
    }
}

/// Keep only organization entities that do not look like skill mentions.
///
/// Non-ORG entities (PER, LOC, ...) are dropped here on purpose: the
/// pipeline anonymizes from this filtered set only, and name/location
/// redaction is covered by the pattern and line-heuristic passes. Callers
/// that need other label classes must retain them in a separate pass.
pub fn filter_entities(entities: Vec<Entity>, skills: &SkillMatcher) -> Vec<Entity> {
    entities
        .into_iter()
        .filter(|ent| ent.label == ORG_LABEL && !skills.matches(&ent.surface))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(terms: &[&str]) -> SkillMatcher {
        SkillMatcher::new(terms.iter().copied()).unwrap()
    }

    #[test]
    fn test_filter_exactness() {
        let entities = vec![
            Entity::new(0, 11, "ORG", "SQL Experts"),
            Entity::new(20, 29, "ORG", "Acme Corp"),
            Entity::new(40, 48, "PER", "Jane Doe"),
        ];
        let filtered = filter_entities(entities, &skills(&["SQL"]));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].surface, "Acme Corp");
    }

    #[test]
    fn test_skill_match_is_case_insensitive() {
        let entities = vec![Entity::new(0, 12, "ORG", "sql experts")];
        let filtered = filter_entities(entities, &skills(&["SQL"]));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_skill_match_is_substring() {
        let entities = vec![Entity::new(0, 16, "ORG", "NoCode Solutions")];
        let filtered = filter_entities(entities, &skills(&["NoCode"]));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let entities = vec![
            Entity::new(30, 38, "ORG", "Initech"),
            Entity::new(5, 14, "ORG", "Acme Corp"),
        ];
        let filtered = filter_entities(entities.clone(), &skills(&["SQL"]));
        assert_eq!(filtered, entities);
    }

    #[test]
    fn test_empty_vocabulary_keeps_all_orgs() {
        let entities = vec![Entity::new(0, 9, "ORG", "Acme Corp")];
        let filtered = filter_entities(entities.clone(), &skills(&[]));
        assert_eq!(filtered, entities);
    }
}
