//! SNILS checksum computation and validation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extractors::SEPARATORS;

/// Number of digits in the body of a SNILS
pub const BODY_LEN: usize = 9;

/// Total number of digits in a SNILS (body + checksum)
pub const SNILS_LEN: usize = 11;

/// Errors raised when an input violates the checksum engine's preconditions.
///
/// A well-formed number whose checksum does not match is not an error; see
/// [`is_valid`] and [`Snils::is_valid`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnilsError {
    #[error("SNILS body must be exactly 9 ASCII digits, got {body:?}")]
    InvalidBody { body: String },
    #[error("Checksum must be in 0..=99, got {0}")]
    ChecksumOutOfRange(u8),
    #[error("SNILS must contain exactly 11 digits, found {found}")]
    InvalidLength { found: usize },
    #[error("Unexpected character {0:?} in SNILS")]
    UnexpectedCharacter(char),
}

/// Compute the expected checksum (0..=99) for a 9-digit body
pub fn compute_checksum(body: &str) -> Result<u8, SnilsError> {
    let digits = parse_body(body).ok_or_else(|| SnilsError::InvalidBody {
        body: body.to_string(),
    })?;
    Ok(checksum_for_digits(&digits))
}

/// Check whether a string holds a SNILS with a matching checksum.
///
/// Every non-digit character is ignored, so `"112-233-445 95"` and
/// `"11223344595"` are treated alike. Anything that does not reduce to
/// exactly 11 digits is invalid.
pub fn is_valid(identifier: &str) -> bool {
    let digits = normalize_digits(identifier);
    if digits.len() != SNILS_LEN {
        return false;
    }

    let (body, checksum) = digits.split_at(BODY_LEN);
    match (compute_checksum(body), checksum.parse::<u8>()) {
        (Ok(expected), Ok(actual)) => expected == actual,
        _ => false,
    }
}

/// Format a checksum as two digits with a leading zero when needed
pub fn format_checksum(checksum: u8) -> Result<String, SnilsError> {
    if checksum > 99 {
        return Err(SnilsError::ChecksumOutOfRange(checksum));
    }
    Ok(format!("{:02}", checksum))
}

/// Keep only the ASCII digits of a string
pub fn normalize_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Render an 11-digit string as `XXX-XXX-XXX YY`
pub fn canonical_form(digits: &str) -> Option<String> {
    if digits.len() != SNILS_LEN || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!(
        "{}-{}-{} {}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    ))
}

/// Weighted digit sum with weights 9 down to 1, reduced to 0..=99
fn checksum_for_digits(digits: &[u8; BODY_LEN]) -> u8 {
    let total: u32 = digits
        .iter()
        .zip((1..=BODY_LEN as u32).rev())
        .map(|(&d, weight)| u32::from(d) * weight)
        .sum();

    match total {
        0..=99 => total as u8,
        100 | 101 => 0,
        _ => {
            let reduced = total % 101;
            // 100 collapses to zero just like the unreduced case
            if reduced == 100 {
                0
            } else {
                reduced as u8
            }
        }
    }
}

fn parse_body(body: &str) -> Option<[u8; BODY_LEN]> {
    let bytes = body.as_bytes();
    if bytes.len() != BODY_LEN {
        return None;
    }

    let mut digits = [0u8; BODY_LEN];
    for (slot, &b) in digits.iter_mut().zip(bytes) {
        if !b.is_ascii_digit() {
            return None;
        }
        *slot = b - b'0';
    }
    Some(digits)
}

/// A syntactically well-formed SNILS.
///
/// Holding a `Snils` does not imply the checksum matches: use
/// [`Snils::is_valid`], or build one with [`Snils::from_body`] to get a
/// number that is valid by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Snils {
    body: [u8; BODY_LEN],
    checksum: u8,
}

impl Snils {
    /// Build a valid SNILS from a 9-digit body, computing its checksum
    pub fn from_body(body: &str) -> Result<Self, SnilsError> {
        let digits = parse_body(body).ok_or_else(|| SnilsError::InvalidBody {
            body: body.to_string(),
        })?;
        Ok(Self {
            body: digits,
            checksum: checksum_for_digits(&digits),
        })
    }

    /// The 9-digit body as a string
    pub fn body(&self) -> String {
        self.body.iter().map(|d| char::from(b'0' + d)).collect()
    }

    /// The checksum as written in the number
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// The checksum the body calls for
    pub fn expected_checksum(&self) -> u8 {
        checksum_for_digits(&self.body)
    }

    pub fn is_valid(&self) -> bool {
        self.checksum == self.expected_checksum()
    }

    /// All 11 digits without separators
    pub fn digits(&self) -> String {
        format!("{}{:02}", self.body(), self.checksum)
    }
}

impl FromStr for Snils {
    type Err = SnilsError;

    /// Parse digits with optional `-`, space or em dash separators
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !c.is_ascii_digit() && !SEPARATORS.contains(c))
        {
            return Err(SnilsError::UnexpectedCharacter(bad));
        }

        let digits = normalize_digits(trimmed);
        if digits.len() != SNILS_LEN {
            return Err(SnilsError::InvalidLength {
                found: digits.len(),
            });
        }

        let (body, checksum) = digits.split_at(BODY_LEN);
        let body = parse_body(body).ok_or_else(|| SnilsError::InvalidBody {
            body: body.to_string(),
        })?;
        let checksum = checksum
            .parse::<u8>()
            .map_err(|_| SnilsError::InvalidLength {
                found: digits.len(),
            })?;

        Ok(Self { body, checksum })
    }
}

impl fmt::Display for Snils {
    /// Canonical `XXX-XXX-XXX YY` form
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.body();
        write!(
            f,
            "{}-{}-{} {:02}",
            &body[0..3],
            &body[3..6],
            &body[6..9],
            self.checksum
        )
    }
}

impl TryFrom<String> for Snils {
    type Error = SnilsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Snils> for String {
    fn from(value: Snils) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_checksum_known_body() {
        assert_eq!(compute_checksum("112233445").unwrap(), 95);
        assert_eq!(compute_checksum("123456789").unwrap(), 64);
    }

    #[test]
    fn test_compute_checksum_small_total() {
        // 1 * 1 = 1
        assert_eq!(compute_checksum("000000001").unwrap(), 1);
        assert_eq!(compute_checksum("000000000").unwrap(), 0);
    }

    #[test]
    fn test_compute_checksum_collapse_cases() {
        // 81 + 8 + 7 + 2 + 2 = 100
        assert_eq!(compute_checksum("911000012").unwrap(), 0);
        // 101
        assert_eq!(compute_checksum("911000013").unwrap(), 0);
        // 201 mod 101 = 100
        assert_eq!(compute_checksum("990209000").unwrap(), 0);
    }

    #[test]
    fn test_compute_checksum_reduced() {
        // 102 mod 101
        assert_eq!(compute_checksum("911000014").unwrap(), 1);
        // 405 mod 101
        assert_eq!(compute_checksum("999999999").unwrap(), 1);
    }

    #[test]
    fn test_compute_checksum_rejects_bad_body() {
        assert!(matches!(
            compute_checksum("12345678"),
            Err(SnilsError::InvalidBody { .. })
        ));
        assert!(matches!(
            compute_checksum("12345678a"),
            Err(SnilsError::InvalidBody { .. })
        ));
        assert!(compute_checksum("1234567890").is_err());
        assert!(compute_checksum("").is_err());
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("11223344595"));
        assert!(is_valid("112-233-445 95"));
        assert!(!is_valid("11223344500"));
        assert!(!is_valid("1122334459"));
        assert!(!is_valid("112233445955"));
    }

    #[test]
    fn test_format_checksum() {
        assert_eq!(format_checksum(5).unwrap(), "05");
        assert_eq!(format_checksum(0).unwrap(), "00");
        assert_eq!(format_checksum(95).unwrap(), "95");
        assert_eq!(
            format_checksum(100),
            Err(SnilsError::ChecksumOutOfRange(100))
        );
    }

    #[test]
    fn test_normalize_digits() {
        assert_eq!(normalize_digits("112-233-445 95"), "11223344595");
        assert_eq!(normalize_digits("112—233—445—95"), "11223344595");
        assert_eq!(normalize_digits("abc"), "");
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(
            canonical_form("11223344595").as_deref(),
            Some("112-233-445 95")
        );
        assert_eq!(canonical_form("1122334459"), None);
        assert_eq!(canonical_form("1122334459a"), None);
    }

    #[test]
    fn test_snils_from_body() {
        let snils = Snils::from_body("112233445").unwrap();
        assert_eq!(snils.checksum(), 95);
        assert!(snils.is_valid());
        assert_eq!(snils.to_string(), "112-233-445 95");
        assert_eq!(snils.digits(), "11223344595");
    }

    #[test]
    fn test_snils_leading_zeros() {
        let snils = Snils::from_body("001001001").unwrap();
        assert_eq!(snils.body(), "001001001");
        assert!(snils.to_string().starts_with("001-001-001 "));
    }

    #[test]
    fn test_snils_parse() {
        let snils: Snils = "112 233 445 95".parse().unwrap();
        assert!(snils.is_valid());

        let invalid: Snils = "123-456-789 00".parse().unwrap();
        assert!(!invalid.is_valid());
        assert_eq!(invalid.expected_checksum(), 64);

        assert_eq!(
            "112-233-445".parse::<Snils>(),
            Err(SnilsError::InvalidLength { found: 9 })
        );
        assert_eq!(
            "112/233/445/95".parse::<Snils>(),
            Err(SnilsError::UnexpectedCharacter('/'))
        );
    }

    #[test]
    fn test_snils_serde_uses_canonical_form() {
        let snils = Snils::from_body("112233445").unwrap();
        let json = serde_json::to_string(&snils).unwrap();
        assert_eq!(json, "\"112-233-445 95\"");

        let parsed: Snils = serde_json::from_str("\"11223344595\"").unwrap();
        assert_eq!(parsed, snils);

        assert!(serde_json::from_str::<Snils>("\"12345\"").is_err());
    }
}
