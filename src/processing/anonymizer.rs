//! Anonymization engine: fuses pattern-based and entity-span redaction
//!
//! All functions here are stateless text-in/text-out transforms. Ordering
//! matters: entity spans are measured against the pristine normalized text,
//! and the pattern/line passes change string length, so [`anonymize`] applies
//! the span pass first and the length-changing passes after it.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AnonymizerError, Result};
use crate::processing::entity::Entity;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("Invalid email regex")
});

// Greedy on purpose: a long run of digits, spaces, hyphens and parentheses
// collapses to a single tag even when it spans two adjacent numbers.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?[0-9\s()\-]{7,}").expect("Invalid phone regex"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("Invalid URL regex"));

pub fn redact_emails(text: &str) -> String {
    EMAIL_RE.replace_all(text, "<EMAIL>").into_owned()
}

pub fn redact_phones(text: &str) -> String {
    PHONE_RE.replace_all(text, "<PHONE>").into_owned()
}

pub fn redact_urls(text: &str) -> String {
    URL_RE.replace_all(text, "<URL>").into_owned()
}

/// Mask short all-capitalized lines such as "Jane Q. Doe" that name/title
/// headers tend to produce and NER tends to miss.
///
/// A line qualifies when it has 2 to 4 whitespace tokens and every token
/// whose first character is alphabetic starts uppercase. Tokens like "42"
/// or "Jr." never block the match.
pub fn mask_personal_lines(text: &str) -> String {
    let masked: Vec<&str> = text
        .split('\n')
        .map(|line| {
            if line_looks_personal(line) {
                "<PERSONAL INFO>"
            } else {
                line
            }
        })
        .collect();
    masked.join("\n")
}

fn line_looks_personal(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&tokens.len())
        && tokens.iter().all(|token| {
            match token.chars().next() {
                Some(first) if first.is_alphabetic() => first.is_uppercase(),
                _ => true,
            }
        })
}

/// Replace each entity span with `<LABEL>`, in descending start order.
///
/// Spans are character offsets into `text` exactly as it was handed to the
/// NER backend. Descending order is a hard correctness requirement: it keeps
/// every not-yet-applied span's offsets valid while earlier (right-most)
/// replacements change the string length. Spans outside the snapshot's
/// bounds are rejected, never clamped into place.
pub fn redact_entities(text: &str, entities: &[Entity]) -> Result<String> {
    let mut chars: Vec<char> = text.chars().collect();
    let char_count = chars.len();

    for ent in entities {
        if ent.start >= ent.end || ent.end > char_count {
            return Err(AnonymizerError::InvalidSpan {
                start: ent.start,
                end: ent.end,
                len: char_count,
            });
        }
    }

    let mut sorted: Vec<&Entity> = entities.iter().collect();
    sorted.sort_by(|a, b| b.start.cmp(&a.start));

    for ent in sorted {
        let tag: Vec<char> = format!("<{}>", ent.label).chars().collect();
        // Overlapping spans may reach past the end of an already-shortened
        // buffer; clamp to the current length like a forgiving slice would.
        let end = ent.end.min(chars.len());
        let start = ent.start.min(end);
        chars.splice(start..end, tag);
    }

    Ok(chars.into_iter().collect())
}

/// Full anonymization: entity spans against the pristine snapshot, then the
/// pattern passes (email, phone, URL) and the personal-info line heuristic
/// on the result.
pub fn anonymize(text: &str, entities: &[Entity]) -> Result<String> {
    let mut out = redact_entities(text, entities)?;
    out = redact_emails(&out);
    out = redact_phones(&out);
    out = redact_urls(&out);
    out = mask_personal_lines(&out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_redaction() {
        let out = redact_emails("write to jane.doe+cv@mail.example.org for details");
        assert_eq!(out, "write to <EMAIL> for details");
    }

    #[test]
    fn test_phone_redaction_greedy_run() {
        let out = redact_phones("call +90 532 123 45 67 now");
        assert_eq!(out, "call <PHONE>now");
    }

    #[test]
    fn test_short_digit_runs_survive() {
        let out = redact_phones("born in 1985");
        assert_eq!(out, "born in 1985");
    }

    #[test]
    fn test_url_redaction() {
        let out = redact_urls("see https://example.com/profile?id=1 and http://t.co/x");
        assert_eq!(out, "see <URL> and <URL>");
    }

    #[test]
    fn test_pattern_coverage() {
        let out = redact_urls(&redact_phones(&redact_emails(
            "Contact me at a.b@example.com or +90 532 123 45 67",
        )));
        assert!(out.contains("<EMAIL>"));
        assert!(out.contains("<PHONE>"));
        // no residual address or digits outside the placeholders
        assert!(!out.contains('@'));
        assert!(!out.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_pattern_passes_are_idempotent() {
        let once = redact_urls(&redact_phones(&redact_emails(
            "a.b@example.com / +1 (555) 123-4567 / https://example.com",
        )));
        let twice = redact_urls(&redact_phones(&redact_emails(&once)));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_personal_line_masked() {
        let out = mask_personal_lines("John Q. Smith\nworked on backend services");
        assert_eq!(out, "<PERSONAL INFO>\nworked on backend services");
    }

    #[test]
    fn test_lowercase_line_unchanged() {
        let out = mask_personal_lines("i love coding");
        assert_eq!(out, "i love coding");
    }

    #[test]
    fn test_five_token_line_unchanged() {
        let line = "Senior Staff Software Engineering Manager";
        assert_eq!(mask_personal_lines(line), line);
    }

    #[test]
    fn test_numeric_token_does_not_block_mask() {
        let out = mask_personal_lines("Jane Doe 42");
        assert_eq!(out, "<PERSONAL INFO>");
    }

    #[test]
    fn test_entity_redaction_descending_order() {
        let text = "John Doe works at Acme Corp in Berlin";
        let entities = vec![
            Entity::new(0, 8, "PER", "John Doe"),
            Entity::new(18, 27, "ORG", "Acme Corp"),
            Entity::new(31, 37, "LOC", "Berlin"),
        ];
        let out = redact_entities(text, &entities).unwrap();
        assert_eq!(out, "<PER> works at <ORG> in <LOC>");
    }

    #[test]
    fn test_ascending_order_would_corrupt() {
        // [0,5) and [3,8) on "AAAAABBB": applied in descending start order
        // the first placeholder stays intact; ascending application instead
        // rewrites through the placeholder inserted at position 0.
        let text = "AAAAABBB";
        let spans = [(0usize, 5usize), (3usize, 8usize)];

        let descending = {
            let entities = vec![
                Entity::new(spans[0].0, spans[0].1, "PER", "AAAAA"),
                Entity::new(spans[1].0, spans[1].1, "PER", "AABBB"),
            ];
            redact_entities(text, &entities).unwrap()
        };

        let ascending = {
            let mut chars: Vec<char> = text.chars().collect();
            for (start, end) in spans {
                let end = end.min(chars.len());
                chars.splice(start.min(end)..end, "<PER>".chars());
            }
            chars.into_iter().collect::<String>()
        };

        assert_ne!(descending, ascending);
        assert!(descending.starts_with("<PER>"));
        assert!(!ascending.starts_with("<PER>"));
    }

    #[test]
    fn test_out_of_bounds_span_rejected() {
        let err = redact_entities("short", &[Entity::new(2, 99, "PER", "x")]).unwrap_err();
        assert!(matches!(
            err,
            AnonymizerError::InvalidSpan { start: 2, end: 99, len: 5 }
        ));
    }

    #[test]
    fn test_empty_span_rejected() {
        let err = redact_entities("short", &[Entity::new(3, 3, "PER", "")]).unwrap_err();
        assert!(matches!(err, AnonymizerError::InvalidSpan { .. }));
    }

    #[test]
    fn test_spans_use_char_offsets() {
        // accent-stripped text is usually ASCII, but the engine must not
        // assume it
        let text = "Ötzi works at Acme Corp";
        let entities = vec![Entity::new(14, 23, "ORG", "Acme Corp")];
        let out = redact_entities(text, &entities).unwrap();
        assert_eq!(out, "Ötzi works at <ORG>");
    }

    #[test]
    fn test_anonymize_composes_all_passes() {
        let text = "John Q. Smith\nemail a.b@example.com phone +1 555 123 4567\nEmployed at Initech Solutions since 2019";
        let entities = vec![Entity::new(70, 87, "ORG", "Initech Solutions")];
        let out = anonymize(text, &entities).unwrap();
        assert!(out.contains("<PERSONAL INFO>"));
        assert!(out.contains("<EMAIL>"));
        assert!(out.contains("<PHONE>"));
        assert!(out.contains("<ORG>"));
        assert!(!out.contains("Initech"));
        assert!(!out.contains("a.b@example.com"));
    }

    #[test]
    fn test_untouched_bytes_identical() {
        let text = "plain line with no pii at all";
        let out = anonymize(text, &[]).unwrap();
        assert_eq!(out, text);
    }
}
