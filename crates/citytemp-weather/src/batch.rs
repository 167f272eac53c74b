//! Batch input: one city per line, `name` or `name;radius`.
//!
//! The first malformed line aborts the whole batch.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::city::City;
use crate::types::CityQuery;

/// Separator between the name and radius fields
pub const FIELD_DELIMITER: char = ';';

/// Suffix that marks interactive input as a batch file
pub const BATCH_FILE_SUFFIX: &str = ".txt";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No such file: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Line {line}: {reason}")]
    ParseFailure { line: usize, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::ParseFailure {
            line,
            reason: reason.into(),
        }
    }

    fn at_line(self, line: usize) -> Self {
        match self {
            Self::ParseFailure { reason, .. } => Self::ParseFailure { line, reason },
            other => other,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "No such file. Check the path and try again.",
            Self::ParseFailure { .. } => {
                "The city list is malformed. Expected `name` or `name;radius` per line."
            }
            Self::Io { .. } => "The city list could not be read.",
        }
    }
}

/// Parse one line; `line_no` is 1-based and only used in errors.
///
/// A line without a radius gets `default_radius_km`.
pub fn parse_line(
    line: &str,
    line_no: usize,
    default_radius_km: f64,
) -> Result<CityQuery, BatchError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

    let query = match fields.as_slice() {
        [name] => CityQuery::new(name, default_radius_km),
        [name, radius] => {
            let radius = radius.trim();
            let radius_km: f64 = radius.parse().map_err(|_| {
                BatchError::parse(line_no, format!("radius '{}' is not a number", radius))
            })?;
            CityQuery::new(name, radius_km)
        }
        _ => Err(BatchError::parse(
            line_no,
            format!(
                "expected at most 2 fields separated by '{}', got {}",
                FIELD_DELIMITER,
                fields.len()
            ),
        )),
    };

    query.map_err(|e| e.at_line(line_no))
}

/// Parse a whole batch, keeping file order. Blank lines are skipped.
pub fn parse_batch(text: &str, default_radius_km: f64) -> Result<Vec<CityQuery>, BatchError> {
    // Editors on Windows often save UTF-8 with a byte order mark.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(line, idx + 1, default_radius_km))
        .collect()
}

/// Read and parse a batch file.
pub async fn load_batch(
    path: impl AsRef<Path>,
    default_radius_km: f64,
) -> Result<Vec<CityQuery>, BatchError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BatchError::SourceNotFound(path.to_path_buf())
        } else {
            BatchError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let queries = parse_batch(&text, default_radius_km)?;
    tracing::debug!("Loaded {} cities from {}", queries.len(), path.display());
    Ok(queries)
}

/// True when interactive input names a batch file
pub fn is_batch_path(input: &str) -> bool {
    input.ends_with(BATCH_FILE_SUFFIX)
}

/// Sort coldest first by current temperature.
pub fn sort_by_temperature(cities: &mut [City]) {
    cities.sort_by(|a, b| {
        a.reading()
            .temperature
            .partial_cmp(&b.reading().temperature)
            .unwrap_or(Ordering::Equal)
    });
}

/// Sort coldest first by the average over each city's region.
///
/// Only regions already fetched count; cities without an average sort last.
pub fn sort_by_region_average(cities: &mut [City]) {
    cities.sort_by(|a, b| match (a.cached_average(), b.cached_average()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_RADIUS_KM;

    #[test]
    fn test_parse_batch_in_file_order() {
        let queries = parse_batch("Tver;30\nMoscow;100\n", DEFAULT_RADIUS_KM).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].name(), "Tver");
        assert_eq!(queries[0].radius_km(), 30.0);
        assert_eq!(queries[1].name(), "Moscow");
        assert_eq!(queries[1].radius_km(), 100.0);
    }

    #[test]
    fn test_parse_line_without_radius_uses_default() {
        let q = parse_line("Kazan", 1, DEFAULT_RADIUS_KM).unwrap();
        assert_eq!(q.name(), "Kazan");
        assert_eq!(q.radius_km(), DEFAULT_RADIUS_KM);
    }

    #[test]
    fn test_configured_default_radius() {
        let q = parse_line("Kazan", 1, 50.0).unwrap();
        assert_eq!(q.radius_km(), 50.0);

        // An explicit radius still wins.
        let queries = parse_batch("Kazan\nTver;10\n", 50.0).unwrap();
        assert_eq!(queries[0].radius_km(), 50.0);
        assert_eq!(queries[1].radius_km(), 10.0);
    }

    #[test]
    fn test_parse_batch_strips_byte_order_mark() {
        let queries = parse_batch("\u{feff}Tver;30\nMoscow\n", DEFAULT_RADIUS_KM).unwrap();
        assert_eq!(queries[0].name(), "Tver");
        assert_eq!(queries[1].name(), "Moscow");
    }

    #[test]
    fn test_parse_batch_skips_blank_lines_and_crlf() {
        let queries =
            parse_batch("Tver;30\r\n\r\n  \nMoscow\r\n", DEFAULT_RADIUS_KM).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].radius_km(), 30.0);
        assert_eq!(queries[1].name(), "Moscow");
    }

    #[test]
    fn test_bad_radius_aborts_batch_with_line_number() {
        let err =
            parse_batch("Tver;30\nMoscow;far\nKazan;10\n", DEFAULT_RADIUS_KM).unwrap_err();
        match err {
            BatchError::ParseFailure { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("far"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_name_with_delimiter_rejected() {
        let err = parse_line("Tver;Moscow;30", 7, DEFAULT_RADIUS_KM).unwrap_err();
        assert!(matches!(err, BatchError::ParseFailure { line: 7, .. }));
    }

    #[test]
    fn test_empty_name_rejected_with_line() {
        let err = parse_batch("Tver\n;30\n", DEFAULT_RADIUS_KM).unwrap_err();
        assert!(matches!(err, BatchError::ParseFailure { line: 2, .. }));
    }

    #[test]
    fn test_negative_radius_rejected() {
        assert!(parse_line("Tver;-5", 1, DEFAULT_RADIUS_KM).is_err());
    }

    #[test]
    fn test_to_line_round_trips() {
        for (name, radius) in [("Tver", 30.0), ("Нижний Новгород", 12.5), ("St. John's", 0.0)] {
            let q = CityQuery::new(name, radius).unwrap();
            assert_eq!(parse_line(&q.to_line(), 1, DEFAULT_RADIUS_KM).unwrap(), q);
        }
    }

    #[test]
    fn test_is_batch_path() {
        assert!(is_batch_path("cities.txt"));
        assert!(!is_batch_path("Moscow"));
        assert!(!is_batch_path("cities.txt;10"));
    }

    #[tokio::test]
    async fn test_load_batch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_batch(dir.path().join("nope.txt"), DEFAULT_RADIUS_KM)
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::SourceNotFound(_)));
        assert!(err.to_string().contains("No such file"));
    }

    #[tokio::test]
    async fn test_load_batch_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.txt");
        std::fs::write(&path, "Тверь;30\nМосква;100\n").unwrap();

        let queries = load_batch(&path, DEFAULT_RADIUS_KM).await.unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].name(), "Тверь");
        assert_eq!(queries[1].radius_km(), 100.0);
    }
}
