//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Validate SNILS numbers and extract them from text, files and web pages.
#[derive(Debug, Parser)]
#[command(name = "snils", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain, global = true)]
    pub format: OutputFormat,

    /// Report numbers whose checksum does not match
    #[arg(long, global = true)]
    pub no_validate: bool,

    /// Config file (defaults to $SNILS_CONFIG, then the user config dir)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a single number
    Check {
        /// Digits, optionally separated by '-', ' ' or '—'
        value: String,
    },
    /// Extract numbers from text (reads stdin when TEXT is omitted)
    Scan {
        text: Option<String>,
    },
    /// Extract numbers from a file
    File {
        path: PathBuf,
        /// Encoding tried before the configured fallbacks
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Extract numbers from a web page
    Url {
        /// Page address; http:// is assumed when no scheme is given
        url: String,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
        /// Scan the raw response instead of the text with markup stripped
        #[arg(long)]
        raw_html: bool,
    },
    /// Read one number from the console and report whether it is valid
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_with_globals() {
        let cli = Cli::try_parse_from(["snils", "scan", "112-233-445 95", "--format", "json"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.no_validate);
        assert!(matches!(cli.command, Command::Scan { text: Some(ref t) } if t == "112-233-445 95"));
    }

    #[test]
    fn test_parse_url_options() {
        let cli = Cli::try_parse_from([
            "snils",
            "--no-validate",
            "url",
            "127.0.0.1:5000",
            "--timeout",
            "3",
            "--raw-html",
        ])
        .unwrap();
        assert!(cli.no_validate);
        match cli.command {
            Command::Url {
                url,
                timeout,
                raw_html,
            } => {
                assert_eq!(url, "127.0.0.1:5000");
                assert_eq!(timeout, Some(3));
                assert!(raw_html);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["snils", "url", "example.com", "--timeout", "0"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["snils"]).is_err());
    }
}
