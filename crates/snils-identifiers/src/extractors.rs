//! SNILS extraction from text

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validators::{canonical_form, is_valid, normalize_digits};

/// Characters allowed between digit groups: hyphen, space, em dash
pub const SEPARATORS: [char; 3] = ['-', ' ', '\u{2014}'];

lazy_static! {
    // Digit groups 3-3-3-2, each boundary optionally holding one separator.
    // Anchored: the scanner applies it at the start of every digit run and
    // handles digit adjacency itself, since the regex crate has no lookaround.
    static ref SNILS_SHAPE: Regex = Regex::new(
        r"^[0-9]{3}[- \x{2014}]?[0-9]{3}[- \x{2014}]?[0-9]{3}[- \x{2014}]?[0-9]{2}"
    ).unwrap();
}

/// A span of text shaped like a SNILS, before checksum validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMatch {
    /// The substring as it appears in the source text
    pub matched: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// The 11 digits with separators removed
    pub digits: String,
}

impl CandidateMatch {
    fn new(text: &str, start: usize, end: usize) -> Self {
        let matched = &text[start..end];
        Self {
            matched: matched.to_string(),
            start,
            end,
            digits: normalize_digits(matched),
        }
    }
}

/// A SNILS found in text, with its canonical `XXX-XXX-XXX YY` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSnils {
    pub matched: String,
    pub start: usize,
    pub end: usize,
    pub digits: String,
    pub canonical: String,
    /// Always true when extraction ran with validation enabled
    pub checksum_valid: bool,
}

/// Find every SNILS-shaped span in text, in order, without validation or
/// deduplication.
///
/// A span must not touch another digit on either side. The exception is a
/// chain of spans laid end to end (`1122334459512345678901`): when the whole
/// chain is bordered by non-digits, each span in it is reported.
pub fn find_candidates(text: &str) -> Vec<CandidateMatch> {
    let bytes = text.as_bytes();
    let mut candidates = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let starts_run =
            bytes[pos].is_ascii_digit() && (pos == 0 || !bytes[pos - 1].is_ascii_digit());
        if !starts_run {
            pos += 1;
            continue;
        }

        match match_chain(text, pos) {
            Some(chain) => {
                pos = chain.last().map_or(pos + 1, |m| m.end);
                candidates.extend(chain);
            }
            None => pos += 1,
        }
    }

    candidates
}

/// Match consecutive shapes starting at `start`.
///
/// Returns `None` when the first shape fails, or when the chain ends on a
/// digit that does not begin another shape.
fn match_chain(text: &str, start: usize) -> Option<Vec<CandidateMatch>> {
    let mut chain = Vec::new();
    let mut pos = start;

    loop {
        let shape = SNILS_SHAPE.find(&text[pos..])?;
        let end = pos + shape.end();
        chain.push(CandidateMatch::new(text, pos, end));

        match text.as_bytes().get(end) {
            Some(b) if b.is_ascii_digit() => pos = end,
            _ => return Some(chain),
        }
    }
}

/// Extract SNILS from text.
///
/// With `validate` set, candidates whose checksum does not match are
/// dropped. Results keep left-to-right order and each distinct number is
/// reported once, at its first occurrence.
pub fn extract(text: &str, validate: bool) -> Vec<ExtractedSnils> {
    let mut seen = HashSet::new();

    find_candidates(text)
        .into_iter()
        .filter_map(|candidate| {
            let checksum_valid = is_valid(&candidate.digits);
            if validate && !checksum_valid {
                return None;
            }
            if !seen.insert(candidate.digits.clone()) {
                return None;
            }

            let canonical = canonical_form(&candidate.digits)?;
            Some(ExtractedSnils {
                matched: candidate.matched,
                start: candidate.start,
                end: candidate.end,
                digits: candidate.digits,
                canonical,
                checksum_valid,
            })
        })
        .collect()
}

/// Extract SNILS with valid checksums
pub fn extract_snils(text: &str) -> Vec<ExtractedSnils> {
    extract(text, true)
}

/// Extract the digits of each SNILS with a valid checksum
pub fn extract_snils_numbers(text: &str) -> Vec<String> {
    extract_snils(text).into_iter().map(|s| s.digits).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_candidates_with_separators() {
        let text = "номер 112-233-445 95 в тексте";
        let found = find_candidates(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched, "112-233-445 95");
        assert_eq!(found[0].digits, "11223344595");
        assert_eq!(&text[found[0].start..found[0].end], "112-233-445 95");
    }

    #[test]
    fn test_find_candidates_em_dash() {
        let found = find_candidates("112—233—445—95");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].digits, "11223344595");
    }

    #[test]
    fn test_find_candidates_mixed_separators() {
        let found = find_candidates("112 233—445-95");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched, "112 233—445-95");
    }

    #[test]
    fn test_find_candidates_rejects_longer_run() {
        assert!(find_candidates("123456789012").is_empty());
        assert!(find_candidates("0112-233-445 95").is_empty());
        assert!(find_candidates("112-233-445 950").is_empty());
    }

    #[test]
    fn test_find_candidates_rejects_double_separator() {
        assert!(find_candidates("112--233-445 95").is_empty());
        assert!(find_candidates("112-233-445  95").is_empty());
    }

    #[test]
    fn test_find_candidates_concatenated() {
        let found = find_candidates("1122334459512345678901");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].digits, "11223344595");
        assert_eq!((found[0].start, found[0].end), (0, 11));
        assert_eq!(found[1].digits, "12345678901");
        assert_eq!((found[1].start, found[1].end), (11, 22));
    }

    #[test]
    fn test_find_candidates_chain_followed_by_digit() {
        // 23 digits: the chain ends on a stray digit, so nothing matches
        assert!(find_candidates("11223344595123456789012").is_empty());
    }

    #[test]
    fn test_find_candidates_skips_number_prefix() {
        // The leading "123" run fails the shape; the real number after it still matches
        let found = find_candidates("123 112 233 445 95");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched, "112 233 445 95");
    }

    #[test]
    fn test_find_candidates_offsets_after_multibyte() {
        let text = "СНИЛС: 11223344595";
        let found = find_candidates(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].start..found[0].end], "11223344595");
    }

    #[test]
    fn test_extract_validates_by_default() {
        assert!(extract_snils("123-456-789 00").is_empty());

        let unvalidated = extract("123-456-789 00", false);
        assert_eq!(unvalidated.len(), 1);
        assert!(!unvalidated[0].checksum_valid);
        assert_eq!(unvalidated[0].canonical, "123-456-789 00");
    }

    #[test]
    fn test_extract_deduplicates() {
        let text = "112-233-445 95, again 11223344595 and 112 233 445 95";
        let found = extract_snils(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched, "112-233-445 95");
        assert_eq!(found[0].start, 0);
    }

    #[test]
    fn test_extract_snils_numbers() {
        let text = "Иванов 112-233-445 95, Петров 156-789-123 17";
        assert_eq!(
            extract_snils_numbers(text),
            vec!["11223344595", "15678912317"]
        );
    }
}
