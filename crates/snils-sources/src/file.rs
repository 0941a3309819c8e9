//! Reading text files in unknown encodings

use std::path::Path;

use encoding_rs::Encoding;
use snils_identifiers::{extract, ExtractedSnils};

use crate::config::FileConfig;
use crate::SourceError;

/// Read a file and decode it, trying `encoding` first and then each fallback
pub fn read_text_file(
    path: &Path,
    encoding: &str,
    fallbacks: &[String],
) -> Result<String, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

    decode_with_fallback(&bytes, encoding, fallbacks).inspect_err(|e| {
        tracing::warn!("Failed to decode {}: {}", path.display(), e);
    })
}

/// Decode bytes with the first encoding that accepts them without errors.
///
/// A byte order mark overrides the label, as in [`Encoding::decode`].
pub fn decode_with_fallback(
    bytes: &[u8],
    encoding: &str,
    fallbacks: &[String],
) -> Result<String, SourceError> {
    let labels = std::iter::once(encoding).chain(fallbacks.iter().map(String::as_str));
    let mut tried = Vec::new();

    for label in labels {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| SourceError::UnsupportedEncoding(label.to_string()))?;

        let (text, used, had_errors) = encoding.decode(bytes);
        if !had_errors {
            if !tried.is_empty() {
                tracing::info!("Decoded as {} after {} failed", used.name(), tried.join(", "));
            }
            return Ok(text.into_owned());
        }

        tracing::debug!("Decoding as {} failed, trying next encoding", used.name());
        tried.push(used.name().to_string());
    }

    Err(SourceError::Decode { tried })
}

/// Read a file with the configured encodings and extract SNILS from it
pub fn scan_file(
    path: &Path,
    config: &FileConfig,
    validate: bool,
) -> Result<Vec<ExtractedSnils>, SourceError> {
    let text = read_text_file(path, &config.encoding, &config.fallback_encodings)?;
    Ok(extract(&text, validate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1251;

    #[test]
    fn test_decode_utf8() {
        let text = decode_with_fallback("СНИЛС 112-233-445 95".as_bytes(), "utf-8", &[]).unwrap();
        assert_eq!(text, "СНИЛС 112-233-445 95");
    }

    #[test]
    fn test_decode_falls_back() {
        let (bytes, _, _) = WINDOWS_1251.encode("Сотрудник: 112-233-445 95");
        let text =
            decode_with_fallback(&bytes, "utf-8", &["windows-1251".to_string()]).unwrap();
        assert_eq!(text, "Сотрудник: 112-233-445 95");
    }

    #[test]
    fn test_decode_without_fallback_fails() {
        let (bytes, _, _) = WINDOWS_1251.encode("Сотрудник");
        let err = decode_with_fallback(&bytes, "utf-8", &[]).unwrap_err();
        match err {
            SourceError::Decode { tried } => assert_eq!(tried, vec!["UTF-8"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_label() {
        assert!(matches!(
            decode_with_fallback(b"abc", "no-such-encoding", &[]),
            Err(SourceError::UnsupportedEncoding(_))
        ));
    }
}
