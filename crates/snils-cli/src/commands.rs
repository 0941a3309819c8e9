//! Command implementations

use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use snils_identifiers::{canonical_form, extract, is_valid, normalize_digits, Snils, SnilsError};
use snils_sources::{scan_file, ConfigError, FileConfig, SnilsConfig, SourceError, WebFetcher};
use thiserror::Error;

use crate::cli::{Cli, Command, OutputFormat};
use crate::output::{write_check, write_results, CheckReport};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Malformed SNILS: {0}")]
    Snils(#[from] SnilsError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Run the parsed command line.
///
/// A `check` or `prompt` on an invalid number exits with status 1; a source
/// that cannot be read is an error rather than an empty result.
pub async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let mut config = SnilsConfig::load(cli.config.as_deref())?;
    let validate = !cli.no_validate;

    match cli.command {
        Command::Check { value } => {
            let snils: Snils = value.parse()?;
            let report = CheckReport::new(&value, &snils);
            write_check(&mut io::stdout().lock(), &report, cli.format)?;
            Ok(exit_code(report.valid))
        }
        Command::Scan { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            write_results(&mut io::stdout().lock(), &extract(&text, validate), cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::File { path, encoding } => run_file(
            &mut io::stdout().lock(),
            &path,
            encoding,
            config.file,
            validate,
            cli.format,
        ),
        Command::Url {
            url,
            timeout,
            raw_html,
        } => {
            if let Some(timeout) = timeout {
                config.fetch.timeout_secs = timeout;
            }
            if raw_html {
                config.fetch.strip_html = false;
            }
            let fetcher = WebFetcher::new(config.fetch)?;
            tracing::debug!(
                "Fetching {} (timeout {}s, strip_html {})",
                url,
                fetcher.config().timeout_secs,
                fetcher.config().strip_html
            );
            let results = fetcher.scan_url(&url, validate).await?;
            tracing::info!("Found {} SNILS at {}", results.len(), url);
            write_results(&mut io::stdout().lock(), &results, cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Prompt => {
            let valid = run_prompt(io::stdin().lock(), &mut io::stdout().lock(), cli.format)?;
            Ok(exit_code(valid))
        }
    }
}

/// Scan one file, with `encoding` taking precedence over the configured one
pub fn run_file<W: Write>(
    out: &mut W,
    path: &Path,
    encoding: Option<String>,
    mut config: FileConfig,
    validate: bool,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    if let Some(encoding) = encoding {
        config.encoding = encoding;
    }
    let results = scan_file(path, &config, validate)?;
    tracing::info!("Found {} SNILS in {}", results.len(), path.display());
    write_results(out, &results, format)?;
    Ok(ExitCode::SUCCESS)
}

/// Ask for one number on `input` and report on `out`
pub fn run_prompt<R: BufRead, W: Write>(
    mut input: R,
    out: &mut W,
    format: OutputFormat,
) -> io::Result<bool> {
    if format == OutputFormat::Plain {
        writeln!(
            out,
            "Пример проверки СНИЛС. Введите СНИЛС (например, 112-233-445 95 или 11223344595):"
        )?;
        out.flush()?;
    }

    let mut line = String::new();
    input.read_line(&mut line)?;
    let entered = line.trim();
    let valid = is_valid(entered);
    let canonical = canonical_form(&normalize_digits(entered));

    match format {
        OutputFormat::Plain => {
            writeln!(out, "Введено: {}", entered)?;
            writeln!(out, "Валиден? {}", if valid { "да" } else { "нет" })?;
            if let (true, Some(canonical)) = (valid, canonical) {
                writeln!(out, "Канонический вид: {}", canonical)?;
            }
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "input": entered,
                "valid": valid,
                "canonical": canonical,
            });
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }

    Ok(valid)
}

fn exit_code(valid: bool) -> ExitCode {
    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
