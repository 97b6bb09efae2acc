//! Writing counts to report files.
//!
//! Three formats are supported:
//!
//! - **text**: `NGram,Count,Share` rows, most frequent first, the share as a
//!   percentage.
//! - **csv**: spreadsheet friendly. Starts with a UTF-8 byte order mark,
//!   uses `,` or `;` between fields and writes the share as a fraction. With
//!   `;` the fraction gets a decimal comma.
//! - **json**: the counts, the total and the ranked rows.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReportError;
use crate::projector::NgramCounts;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";
const TEXT_SEPARATOR: char = ',';

/// Output format of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl ReportFormat {
    /// File extension of the report, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ReportError::UnknownFormat(s.to_owned())),
        }
    }
}

/// What the keys of a report are. Only changes the first header column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    NGram,
    Byte,
}

impl ReportKind {
    fn column(self) -> &'static str {
        match self {
            Self::NGram => "NGram",
            Self::Byte => "Byte",
        }
    }
}

/// How a report is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub format: ReportFormat,
    pub kind: ReportKind,
    /// Field separator for CSV reports, `,` or `;`.
    pub separator: char,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            kind: ReportKind::NGram,
            separator: ';',
        }
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    key: &'a str,
    count: u64,
    share: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    kind: ReportKind,
    #[serde(flatten)]
    counts: &'a NgramCounts,
    ranked: Vec<JsonRow<'a>>,
}

/// Writes `counts` to `writer` in the format `options` asks for.
///
/// # Errors
///
/// [`ReportError::InvalidSeparator`] for a CSV separator other than `,` or
/// `;`, otherwise whatever writing fails with.
///
/// # Examples
///
/// ```
/// use ngram_counter::report::{write_report, ReportOptions};
///
/// let counts = ngram_counter::count_bytes(&b"aab"[..]).unwrap();
/// let mut out = Vec::new();
/// write_report(&mut out, &counts, ReportOptions::default()).unwrap();
///
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("NGram,Count,Share\n\"61\",2,"));
/// ```
pub fn write_report<W: Write>(writer: &mut W, counts: &NgramCounts, options: ReportOptions) -> Result<(), ReportError> {
    match options.format {
        ReportFormat::Text => write_text(writer, counts, options.kind)?,
        ReportFormat::Csv => write_csv(writer, counts, options.kind, options.separator)?,
        ReportFormat::Json => write_json(writer, counts, options.kind)?,
    }
    writer.flush()?;
    Ok(())
}

fn write_text<W: Write>(writer: &mut W, counts: &NgramCounts, kind: ReportKind) -> Result<(), ReportError> {
    write_header(writer, kind, TEXT_SEPARATOR)?;
    for (key, count) in counts.ranked() {
        write_quoted(writer, key)?;
        writeln!(writer, "{TEXT_SEPARATOR}{count}{TEXT_SEPARATOR}{}%", counts.share(count))?;
    }
    Ok(())
}

fn write_csv<W: Write>(writer: &mut W, counts: &NgramCounts, kind: ReportKind, separator: char) -> Result<(), ReportError> {
    if separator != ',' && separator != ';' {
        return Err(ReportError::InvalidSeparator(separator));
    }

    writer.write_all(UTF8_BOM)?;
    write_header(writer, kind, separator)?;
    for (key, count) in counts.ranked() {
        // Keeps spreadsheets from reading the key as a number.
        if key.starts_with(|c: char| c.is_ascii_digit()) {
            writer.write_all(b"=")?;
        }
        write_quoted(writer, key)?;

        let mut fraction = (counts.share(count) / 100.0).to_string();
        if separator == ';' {
            fraction = fraction.replace('.', ",");
        }
        writeln!(writer, "{separator}{count}{separator}{fraction}")?;
    }
    Ok(())
}

fn write_json<W: Write>(writer: &mut W, counts: &NgramCounts, kind: ReportKind) -> Result<(), ReportError> {
    let ranked = counts
        .ranked()
        .into_iter()
        .map(|(key, count)| JsonRow {
            key,
            count,
            share: counts.share(count),
        })
        .collect();
    let report = JsonReport { kind, counts, ranked };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

fn write_header<W: Write>(writer: &mut W, kind: ReportKind, separator: char) -> Result<(), ReportError> {
    writeln!(writer, "{}{separator}Count{separator}Share", kind.column())?;
    Ok(())
}

fn write_quoted<W: Write>(writer: &mut W, key: &str) -> Result<(), ReportError> {
    write!(writer, "\"{}\"", key.replace('"', "\"\""))?;
    Ok(())
}

/// Where the report for `input` goes.
///
/// Text reports replace the extension: `dir/name.ext` becomes
/// `dir/name_ext.txt`. The other formats append theirs: `dir/name.ext.csv`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ngram_counter::report::{output_path, ReportFormat};
///
/// assert_eq!(output_path(Path::new("in/book.md"), ReportFormat::Text), Path::new("in/book_md.txt"));
/// assert_eq!(output_path(Path::new("in/book.md"), ReportFormat::Csv), Path::new("in/book.md.csv"));
/// ```
#[must_use]
pub fn output_path(input: &Path, format: ReportFormat) -> PathBuf {
    match format {
        ReportFormat::Text => {
            let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_owned();
            if let Some(extension) = input.extension() {
                name.push("_");
                name.push(extension);
            }
            name.push(".txt");
            input.with_file_name(name)
        }
        ReportFormat::Csv | ReportFormat::Json => {
            let mut name = input.as_os_str().to_owned();
            name.push(".");
            name.push(format.extension());
            PathBuf::from(name)
        }
    }
}

/// Writes the report for `input` next to it and returns the report's path.
///
/// # Errors
///
/// As for [`write_report`], plus failing to create the file.
pub fn write_report_file(input: &Path, counts: &NgramCounts, options: ReportOptions) -> Result<PathBuf, ReportError> {
    if options.format == ReportFormat::Csv && options.separator != ',' && options.separator != ';' {
        return Err(ReportError::InvalidSeparator(options.separator));
    }

    let path = output_path(input, options.format);
    let mut writer = BufWriter::new(File::create(&path)?);
    write_report(&mut writer, counts, options)?;
    debug!(path = %path.display(), format = %options.format, "report written");
    Ok(path)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{Extractor, ExtractorConfig, WindowMode};

    fn ngrams(size: u8, text: &str) -> NgramCounts {
        let config = ExtractorConfig::new(size, WindowMode::Overlapping).unwrap();
        Extractor::new(&config).unwrap().scan_str(text).unwrap()
    }

    fn render(counts: &NgramCounts, options: ReportOptions) -> String {
        let mut out = Vec::new();
        write_report(&mut out, counts, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_report_ranks_and_quotes() {
        let text = render(&ngrams(1, "b\"a\""), ReportOptions::default());
        assert_eq!(text, "NGram,Count,Share\n\"\"\"\",2,50%\n\"a\",1,25%\n\"b\",1,25%\n");
    }

    #[test]
    fn text_report_of_nothing_is_header_only() {
        let text = render(&NgramCounts::default(), ReportOptions::default());
        assert_eq!(text, "NGram,Count,Share\n");
    }

    #[test]
    fn csv_report_semicolon() {
        let options = ReportOptions {
            format: ReportFormat::Csv,
            kind: ReportKind::Byte,
            separator: ';',
        };
        let counts = crate::count_bytes(&b"\x01\x01\xab\xab"[..]).unwrap();
        let csv = render(&counts, options);
        assert_eq!(csv, "\u{feff}Byte;Count;Share\n=\"01\";2;0,5\n\"AB\";2;0,5\n");
    }

    #[test]
    fn csv_report_comma_keeps_decimal_point() {
        let options = ReportOptions {
            format: ReportFormat::Csv,
            kind: ReportKind::NGram,
            separator: ',',
        };
        let csv = render(&ngrams(2, "xyxyx"), options);
        assert!(csv.contains("\"xy\",2,0.5\n"));
    }

    #[test]
    fn csv_rejects_other_separators() {
        let options = ReportOptions {
            format: ReportFormat::Csv,
            kind: ReportKind::NGram,
            separator: '|',
        };
        let err = write_report(&mut Vec::new(), &ngrams(1, "a"), options).unwrap_err();
        assert!(matches!(err, ReportError::InvalidSeparator('|')));
    }

    #[test]
    fn json_report_has_counts_and_ranking() {
        let options = ReportOptions {
            format: ReportFormat::Json,
            ..ReportOptions::default()
        };
        let json: serde_json::Value = serde_json::from_str(&render(&ngrams(1, "aab"), options)).unwrap();
        assert_eq!(json["kind"], "ngram");
        assert_eq!(json["total"], 3);
        assert_eq!(json["counts"]["a"], 2);
        assert_eq!(json["ranked"][0]["key"], "a");
        assert_eq!(json["ranked"][1]["count"], 1);
    }

    #[test]
    fn format_names() {
        assert_eq!("CSV".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert_eq!("txt".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!(matches!("xml".parse::<ReportFormat>(), Err(ReportError::UnknownFormat(name)) if name == "xml"));
        assert_eq!(ReportFormat::Json.to_string(), "json");
    }

    #[test]
    fn output_paths() {
        assert_eq!(output_path(Path::new("notes"), ReportFormat::Text), Path::new("notes.txt"));
        assert_eq!(output_path(Path::new("a/b.c.d"), ReportFormat::Text), Path::new("a/b.c_d.txt"));
        assert_eq!(output_path(Path::new("a/b.c"), ReportFormat::Json), Path::new("a/b.c.json"));
    }

    #[test]
    fn report_file_lands_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sample.txt");
        let path = write_report_file(&input, &ngrams(1, "aa"), ReportOptions::default()).unwrap();
        assert_eq!(path, dir.path().join("sample_txt.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "NGram,Count,Share\n\"a\",2,100%\n");
    }
}
