//! Best-effort loading of newline-delimited value streams
//!
//! One value per line. Surrounding whitespace (including a `\r` left by CRLF
//! line endings) is trimmed and blank lines are ignored. A line that does not
//! parse is recorded in [`Ingested::skipped`], logged at `warn` and skipped,
//! so a single bad token never aborts a load. Only I/O failures are errors.

use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use log::{debug, warn};
use num_traits::float::FloatCore;

use crate::{IngestError, SearchTree};

/// A line that was dropped during ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number
    pub line: usize,
    /// Why the line was rejected
    pub reason: String,
}

/// Values recovered from a stream, plus every line that was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested<T> {
    /// Parsed values in input order
    pub values: Vec<T>,
    /// Lines that could not be parsed, in input order
    pub skipped: Vec<SkippedLine>,
}

impl<T: FloatCore> Ingested<T> {
    const fn new() -> Self {
        Self {
            values: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Feeds every parsed value into `target`, in input order
    pub fn fill<E: Extend<T>>(self, target: &mut E) {
        target.extend(self.values);
    }

    /// Builds a tree holding every parsed value
    ///
    /// # Examples
    ///
    /// ```
    /// # use order_stats::{AvlTree, OrderStatistics, ingest};
    /// let report = ingest::parse_values::<f64>("3\r\n1\nbad\n2\n");
    /// assert_eq!(report.skipped.len(), 1);
    ///
    /// let tree: AvlTree<f64> = report.into_tree();
    /// assert_eq!(tree.median(), 2.0);
    /// ```
    pub fn into_tree<S>(self) -> S
    where
        S: SearchTree<Key = T> + Default,
    {
        let mut tree = S::default();
        for value in self.values {
            tree.insert(value);
        }
        tree
    }

    fn accept(&mut self, line: usize, raw: &str)
    where
        T: FromStr,
        T::Err: Display,
    {
        let token = raw.trim();
        if token.is_empty() {
            return;
        }

        match token.parse::<T>() {
            Ok(value) => self.values.push(value),
            Err(err) => self.skip(line, err.to_string()),
        }
    }

    fn skip(&mut self, line: usize, reason: String) {
        warn!("skipping line {line}: {reason}");
        self.skipped.push(SkippedLine { line, reason });
    }

    fn finish(self, source: &str) -> Self {
        debug!(
            "ingested {} values from {source}, skipped {} lines",
            self.values.len(),
            self.skipped.len()
        );
        self
    }
}

/// Parses values from an in-memory string
pub fn parse_values<T>(input: &str) -> Ingested<T>
where
    T: FloatCore + FromStr,
    T::Err: Display,
{
    let mut report = Ingested::new();
    for (idx, raw) in input.lines().enumerate() {
        report.accept(idx + 1, raw);
    }
    report.finish("string input")
}

/// Parses values from any buffered reader
///
/// Lines that are not valid UTF-8 are skipped like any other malformed line.
///
/// # Errors
///
/// Returns [`IngestError::Read`] if the underlying reader fails.
pub fn read_values<T, R>(reader: R) -> Result<Ingested<T>, IngestError>
where
    T: FloatCore + FromStr,
    T::Err: Display,
    R: BufRead,
{
    let mut report = Ingested::new();
    for (idx, chunk) in reader.split(b'\n').enumerate() {
        let line = idx + 1;
        let bytes = chunk.map_err(|source| IngestError::Read { line, source })?;
        match core::str::from_utf8(&bytes) {
            Ok(raw) => report.accept(line, raw),
            Err(err) => report.skip(line, err.to_string()),
        }
    }
    Ok(report.finish("reader"))
}

/// Opens `path` and parses one value per line
///
/// # Errors
///
/// Returns [`IngestError::Open`] if the file cannot be opened and
/// [`IngestError::Read`] if reading fails part way through.
pub fn load_values<T, P>(path: P) -> Result<Ingested<T>, IngestError>
where
    T: FloatCore + FromStr,
    T::Err: Display,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let report = read_values(BufReader::new(file))?;
    debug!("loaded {}", path.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrderStatistics, RbTree, UnsortedArray};
    use std::{error::Error, io, io::Cursor};

    #[test]
    fn test_parse_strips_carriage_returns_and_blanks() {
        let report = parse_values::<f64>("15\r\n10\r\n\r\n  20  \n\n-2.5e1\n");
        assert_eq!(report.values, vec![15.0, 10.0, 20.0, -25.0]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped_not_fatal() {
        let report = parse_values::<f64>("1\nabc\n2\n3,5\n4");
        assert_eq!(report.values, vec![1.0, 2.0, 4.0]);

        let lines: Vec<usize> = report.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![2, 4]);
        assert!(!report.skipped[0].reason.is_empty());
    }

    #[test]
    fn test_read_values_skips_invalid_utf8() {
        let bytes: &[u8] = b"1.5\n\xff\xfe\n2.5\r\n";
        let report = read_values::<f64, _>(Cursor::new(bytes)).unwrap();
        assert_eq!(report.values, vec![1.5, 2.5]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 2);
    }

    #[test]
    fn test_read_error_is_reported_with_line() {
        struct Failing;

        impl io::Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk gone"))
            }
        }

        let err = read_values::<f64, _>(io::BufReader::new(Failing)).unwrap_err();
        assert!(matches!(err, IngestError::Read { line: 1, .. }));
        assert_eq!(err.to_string(), "failed to read line 1");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let path = std::env::temp_dir().join("order-stats-definitely-missing.txt");
        let err = load_values::<f64, _>(&path).unwrap_err();
        match err {
            IngestError::Open { path: reported, source } => {
                assert_eq!(reported, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_values_from_file() {
        let path = std::env::temp_dir().join(format!("order-stats-ingest-{}.txt", std::process::id()));
        std::fs::write(&path, "15\r\n10\r\n20\r\noops\r\n10\r\n30\r\n5\r\n").unwrap();

        let report = load_values::<f64, _>(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(report.skipped.len(), 1);
        let tree: RbTree<f64> = report.into_tree();
        assert_eq!(tree.sorted(), vec![5.0, 10.0, 10.0, 15.0, 20.0, 30.0]);
        assert_eq!(tree.median(), 12.5);
    }

    #[test]
    fn test_fill_extends_any_container() {
        let report = parse_values::<f32>("2\n1\n3\n");
        let mut array = UnsortedArray::new();
        report.fill(&mut array);
        assert_eq!(array.median(), 2.0);
    }
}
