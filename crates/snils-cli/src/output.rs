//! Rendering results for the terminal

use std::io::{self, Write};

use serde::Serialize;
use snils_identifiers::{ExtractedSnils, Snils};

use crate::cli::OutputFormat;

/// Outcome of checking a single number
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub input: String,
    pub valid: bool,
    pub canonical: String,
    pub checksum: u8,
    pub expected_checksum: u8,
}

impl CheckReport {
    pub fn new(input: &str, snils: &Snils) -> Self {
        Self {
            input: input.to_string(),
            valid: snils.is_valid(),
            canonical: snils.to_string(),
            checksum: snils.checksum(),
            expected_checksum: snils.expected_checksum(),
        }
    }
}

pub fn write_results<W: Write>(
    out: &mut W,
    results: &[ExtractedSnils],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, results)?;
            writeln!(out)
        }
        OutputFormat::Plain => {
            if results.is_empty() {
                return writeln!(out, "No SNILS found");
            }
            for result in results {
                write!(out, "{} -> {}", result.matched, result.canonical)?;
                if !result.checksum_valid {
                    write!(out, " (invalid checksum)")?;
                }
                writeln!(out)?;
            }
            Ok(())
        }
    }
}

pub fn write_check<W: Write>(
    out: &mut W,
    report: &CheckReport,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)
        }
        OutputFormat::Plain if report.valid => writeln!(out, "{}: valid", report.canonical),
        OutputFormat::Plain => writeln!(
            out,
            "{}: invalid (checksum {:02}, expected {:02})",
            report.canonical, report.checksum, report.expected_checksum
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snils_identifiers::extract;

    fn render(results: &[ExtractedSnils], format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_results(&mut buf, results, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_plain_results() {
        let results = extract("11223344595 and 123-456-789 00", false);
        assert_eq!(
            render(&results, OutputFormat::Plain),
            "11223344595 -> 112-233-445 95\n123-456-789 00 -> 123-456-789 00 (invalid checksum)\n"
        );
    }

    #[test]
    fn test_plain_empty() {
        assert_eq!(render(&[], OutputFormat::Plain), "No SNILS found\n");
    }

    #[test]
    fn test_json_results() {
        let results = extract("112-233-445 95", true);
        let json: serde_json::Value =
            serde_json::from_str(&render(&results, OutputFormat::Json)).unwrap();
        assert_eq!(json[0]["canonical"], "112-233-445 95");
        assert_eq!(render(&[], OutputFormat::Json).trim(), "[]");
    }

    #[test]
    fn test_check_report() {
        let snils: Snils = "12345678900".parse().unwrap();
        let report = CheckReport::new("12345678900", &snils);

        let mut buf = Vec::new();
        write_check(&mut buf, &report, OutputFormat::Plain).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "123-456-789 00: invalid (checksum 00, expected 64)\n"
        );
    }
}
