//! Command line front end: counts n-grams or bytes in files and writes a
//! report next to each one.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ngram_counter::report::{self, ReportFormat, ReportKind, ReportOptions};
use ngram_counter::{Extractor, ExtractorConfig, NgramCounts, WindowMode, count_bytes, utf8_chars};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE_ERROR: u8 = 1;
const PROCESSING_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "ngram-counter")]
#[command(version)]
#[command(about = "Count n-grams or bytes in files", long_about = None)]
struct Cli {
    /// N-gram size (1-255). Without it, or with 0, bytes are counted.
    #[arg(short = 's', long = "size", value_name = "N", default_value_t = 0)]
    size: u8,

    /// Count back-to-back n-grams instead of overlapping ones
    #[arg(short = 'q', long = "sequential")]
    sequential: bool,

    /// Only count letters and digits
    #[arg(short = 'l', long = "letters-and-digits")]
    letters_and_digits: bool,

    /// Skip whitespace
    #[arg(short = 'w', long = "ignore-whitespace")]
    ignore_whitespace: bool,

    /// Report format (text, csv or json)
    #[arg(short = 'f', long = "format", value_name = "FORMAT", default_value = "text")]
    format: ReportFormat,

    /// Field separator for csv reports (';' or ',')
    #[arg(long = "separator", value_name = "CHAR", default_value_t = ';')]
    separator: char,

    /// Enable debug logging
    #[arg(long = "debug")]
    debug: bool,

    /// Files to analyze
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,
}

impl Cli {
    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            format: self.format,
            kind: if self.size == 0 { ReportKind::Byte } else { ReportKind::NGram },
            separator: self.separator,
        }
    }

    fn extractor_config(&self) -> Result<ExtractorConfig> {
        let mode = if self.sequential { WindowMode::Sequential } else { WindowMode::Overlapping };
        let config = ExtractorConfig::builder()
            .window_size(self.size)
            .mode(mode)
            .letters_and_digits_only(self.letters_and_digits)
            .ignore_whitespace(self.ignore_whitespace)
            .build()?;
        Ok(config)
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn count_file(path: &Path, cli: &Cli) -> Result<NgramCounts> {
    let file = File::open(path).context("could not open file")?;
    if cli.size == 0 {
        return Ok(count_bytes(file)?);
    }

    let config = cli.extractor_config()?;
    let mut extractor = Extractor::new(&config)?;
    Ok(extractor.scan(utf8_chars(BufReader::new(file)))?)
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.report_options();
    for path in &cli.files {
        info!(file = %path.display(), size = cli.size, "Analyzing file");

        let counts = count_file(path, cli).with_context(|| format!("Error analyzing file '{}'", path.display()))?;
        let written = report::write_report_file(path, &counts, options)
            .with_context(|| format!("Error writing count file for '{}'", path.display()))?;

        info!(
            report = %written.display(),
            total = counts.total(),
            distinct = counts.len(),
            "Report written"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { ExitCode::from(USAGE_ERROR) } else { ExitCode::SUCCESS };
            let _ = err.print();
            return code;
        }
    };

    init_tracing(cli.debug);

    if cli.format == ReportFormat::Csv && cli.separator != ';' && cli.separator != ',' {
        error!("separator must be either ',' or ';' but is '{}'", cli.separator);
        return ExitCode::from(USAGE_ERROR);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(PROCESSING_ERROR)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_count_bytes_as_text() {
        let cli = Cli::try_parse_from(["ngram-counter", "a.txt"]).unwrap();
        assert_eq!(cli.size, 0);
        assert_eq!(cli.format, ReportFormat::Text);
        assert_eq!(cli.report_options().kind, ReportKind::Byte);
    }

    #[test]
    fn ngram_flags() {
        let cli = Cli::try_parse_from(["ngram-counter", "-s", "3", "--sequential", "-w", "--format", "csv", "a", "b"]).unwrap();
        assert_eq!(cli.files.len(), 2);
        let config = cli.extractor_config().unwrap();
        assert_eq!(config.window_size(), 3);
        assert_eq!(config.mode(), WindowMode::Sequential);
        assert!(config.ignore_whitespace());
        assert_eq!(cli.report_options().kind, ReportKind::NGram);
        assert_eq!(cli.report_options().format, ReportFormat::Csv);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["ngram-counter"]).is_err());
        assert!(Cli::try_parse_from(["ngram-counter", "--size", "256", "a"]).is_err());
        assert!(Cli::try_parse_from(["ngram-counter", "--format", "xml", "a"]).is_err());
    }

    #[test]
    fn run_writes_reports() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("words.txt");
        std::fs::write(&input, "ababa").unwrap();

        let cli = Cli::try_parse_from(["ngram-counter", "-s", "2", input.to_str().unwrap()]).unwrap();
        run(&cli).unwrap();

        let report = std::fs::read_to_string(dir.path().join("words_txt.txt")).unwrap();
        assert_eq!(report, "NGram,Count,Share\n\"ab\",2,50%\n\"ba\",2,50%\n");
    }

    #[test]
    fn run_names_the_failing_file() {
        let cli = Cli::try_parse_from(["ngram-counter", "/nonexistent/input"]).unwrap();
        let err = run(&cli).unwrap_err();
        assert!(format!("{err:#}").starts_with("Error analyzing file '/nonexistent/input'"));
    }
}
