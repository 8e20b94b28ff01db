//! Offline conversion of the vendor CSV export into the pipe-delimited song
//! list read by the catalog loader. Only rows whose language column mentions
//! English survive; only the title and artist columns are kept.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::TransformError;

/// Cell separator of the vendor export.
const CSV_DELIMITER: char = ';';
/// Field separator of the generated song list.
const OUTPUT_DELIMITER: &str = "|";
/// Fixed column positions in the vendor export.
const TITLE_COLUMN: usize = 1;
const ARTIST_COLUMN: usize = 2;

/// Counts reported after a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformSummary {
    /// Data rows in the input, header excluded.
    pub total_rows: usize,
    /// Rows written to the output, header excluded.
    pub kept_rows: usize,
}

/// Convert CSV text to song list text.
///
/// The header row decides which column holds the language (first header
/// containing "language", case-insensitive) and is re-emitted with its own
/// title/artist cells. Cells are split on `;` without CSV quoting rules.
pub fn convert_csv(raw: &str) -> Result<(String, TransformSummary), TransformError> {
    let mut rows = raw
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .map(|line| line.split(CSV_DELIMITER).collect::<Vec<_>>());

    let header = rows.next().unwrap_or_default();
    debug!(?header, "csv headers");
    let language_column = header
        .iter()
        .position(|cell| cell.to_lowercase().contains("language"))
        .ok_or(TransformError::MissingLanguageColumn)?;
    debug!(language_column, "language column found");

    let mut lines = vec![select_columns(&header)];
    let mut total_rows = 0;
    for row in rows {
        if row.len() == 1 && row[0].is_empty() {
            continue;
        }
        total_rows += 1;
        let Some(language) = row.get(language_column) else {
            continue;
        };
        if language.to_lowercase().contains("english") {
            lines.push(select_columns(&row));
        }
    }

    let summary = TransformSummary {
        total_rows,
        kept_rows: lines.len() - 1,
    };
    Ok((lines.join("\n"), summary))
}

/// Read `input`, convert it and write the song list to `output`.
pub fn convert_file(input: &Path, output: &Path) -> Result<TransformSummary, TransformError> {
    let io_err = |path: &Path| {
        let path = path.display().to_string();
        move |source: std::io::Error| TransformError::Io { path, source }
    };

    let raw = fs::read_to_string(input).map_err(io_err(input))?;
    let (text, summary) = convert_csv(&raw)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    fs::write(output, text).map_err(io_err(output))?;

    info!(
        total = summary.total_rows,
        english = summary.kept_rows,
        output = %output.display(),
        "song list conversion complete"
    );
    Ok(summary)
}

fn select_columns(row: &[&str]) -> String {
    let title = row.get(TITLE_COLUMN).copied().unwrap_or_default();
    let artist = row.get(ARTIST_COLUMN).copied().unwrap_or_default();
    [requote(title), requote(artist)].join(OUTPUT_DELIMITER)
}

/// Drop a leading and a trailing quote (each independently), double any
/// remaining quotes and wrap the result in quotes.
fn requote(cell: &str) -> String {
    let cell = cell.strip_prefix('"').unwrap_or(cell);
    let cell = cell.strip_suffix('"').unwrap_or(cell);
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;

    const EXPORT: &str = "Id;Title;Artist;Year;Languages\n\
1;Tennessee Whiskey;Chris Stapleton;2015;English\n\
2;La Bamba;Ritchie Valens;1958;Spanish\n\
3;\"Say \"Hi\"\";Band;2001;english, french\n\
4;Short;Row\n\
5;;;1999;ENGLISH\n";

    #[test]
    fn keeps_only_english_rows() {
        let (text, summary) = convert_csv(EXPORT).unwrap();
        assert_eq!(
            summary,
            TransformSummary {
                total_rows: 5,
                kept_rows: 3
            }
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "\"Title\"|\"Artist\"",
                "\"Tennessee Whiskey\"|\"Chris Stapleton\"",
                "\"Say \"\"Hi\"\"\"|\"Band\"",
                "\"\"|\"\"",
            ]
        );
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn missing_language_column_is_an_error() {
        let err = convert_csv("Id;Title;Artist\n1;A;B\n").unwrap_err();
        assert!(matches!(err, TransformError::MissingLanguageColumn));
    }

    #[test]
    fn output_feeds_the_catalog_loader() {
        let (text, _) = convert_csv(EXPORT).unwrap();
        let songs = parse_catalog(&text);
        assert_eq!(songs.len(), 3);
        assert!(songs
            .iter()
            .any(|s| s.title == "Tennessee Whiskey" && s.artist == "Chris Stapleton"));
    }

    #[test]
    fn convert_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        let output = dir.path().join("public").join("SongList.txt");
        fs::write(&input, EXPORT).unwrap();

        let summary = convert_file(&input, &output).unwrap();
        assert_eq!(summary.kept_rows, 3);
        assert!(fs::read_to_string(&output)
            .unwrap()
            .starts_with("\"Title\"|\"Artist\""));
    }

    #[test]
    fn convert_file_reports_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_file(&dir.path().join("nope.csv"), &dir.path().join("out.txt"))
            .unwrap_err();
        assert!(matches!(err, TransformError::Io { .. }));
    }
}
