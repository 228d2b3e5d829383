//! Streaming drug dataset parser.
//!
//! Reads a dataset line by line, discarding the header, and yields one parsed
//! [`Drug`] per record. Lines are read as raw bytes, so a line that is not
//! valid UTF-8 is reported as a malformed record at its own line number.

use std::fs::File;
use std::io::{BufRead, BufReader, Split};
use std::path::Path;

use drugbank_types::Drug;

use crate::record::parse_drug_line;
use crate::types::{DrugLoadError, DrugResult, LoadConfig, MalformedPolicy, MalformedRecord};

/// A parsed record together with the line it came from.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    /// 1-based line number, header included.
    pub line: usize,
    /// The parsed drug.
    pub drug: Drug,
}

/// A streaming parser for drug dataset files.
///
/// Reads record by record so the raw file never has to be held in memory.
/// The first line is treated as a header and skipped; blank lines are
/// ignored.
pub struct DrugParser<R: BufRead> {
    lines: Split<R>,
    config: LoadConfig,
    line_number: usize,
    records_read: usize,
}

impl DrugParser<BufReader<File>> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns [`DrugLoadError::FileNotFound`] if the path does not exist, or
    /// an I/O error if it cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P, config: LoadConfig) -> DrugResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DrugLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }
}

impl<R: BufRead> DrugParser<R> {
    /// Creates a new parser from a reader, consuming the header line.
    pub fn from_reader(reader: R, config: LoadConfig) -> DrugResult<Self> {
        let mut lines = reader.split(b'\n');
        let mut line_number = 0;

        if let Some(header) = lines.next() {
            header?;
            line_number = 1;
        }

        Ok(Self {
            lines,
            config,
            line_number,
            records_read: 0,
        })
    }

    /// Returns the number of non-blank records read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Returns the parser configuration.
    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Parses all records into a Vec.
    ///
    /// Under [`MalformedPolicy::Abort`] the first malformed record is
    /// returned as an error. Under [`MalformedPolicy::Skip`] malformed records
    /// are logged and dropped; the second value counts them. I/O errors are
    /// always returned.
    pub fn parse_all(self) -> DrugResult<(Vec<ParsedRecord>, usize)> {
        let policy = self.config.malformed;
        collect_records(self, policy)
    }
}

impl<R: BufRead> Iterator for DrugParser<R> {
    type Item = DrugResult<ParsedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let bytes = match self.lines.next()? {
                Ok(bytes) => bytes,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            if is_blank(&bytes) {
                continue;
            }

            self.records_read += 1;
            return Some(parse_record(self.line_number, bytes));
        }
    }
}

/// Decodes and parses one raw record line.
///
/// Both encoding and structural failures carry `line`.
pub(crate) fn parse_record(line: usize, bytes: Vec<u8>) -> DrugResult<ParsedRecord> {
    let text = String::from_utf8(bytes).map_err(|e| {
        MalformedRecord::InvalidEncoding {
            valid_up_to: e.utf8_error().valid_up_to(),
        }
        .at_line(line)
    })?;
    let drug = parse_drug_line(&text).map_err(|e| e.at_line(line))?;
    Ok(ParsedRecord { line, drug })
}

/// Collects parse results, applying the malformed-record policy.
///
/// Returns the parsed records and the number of malformed records skipped.
/// Errors other than [`DrugLoadError::Malformed`] are always returned.
pub(crate) fn collect_records<I>(
    results: I,
    policy: MalformedPolicy,
) -> DrugResult<(Vec<ParsedRecord>, usize)>
where
    I: IntoIterator<Item = DrugResult<ParsedRecord>>,
{
    let mut records = Vec::new();
    let mut skipped = 0;

    for result in results {
        match result {
            Ok(record) => records.push(record),
            Err(err @ DrugLoadError::Malformed { .. }) if policy == MalformedPolicy::Skip => {
                tracing::warn!("Skipping record: {}", err);
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok((records, skipped))
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Reads every line after the header as raw bytes, keeping its line number.
///
/// Blank lines are dropped and the `\n` terminator is removed. Used by the
/// parallel loader, which decodes and parses the lines after they are all in
/// memory.
pub fn read_lines_skip_header<P: AsRef<Path>>(path: P) -> DrugResult<Vec<(usize, Vec<u8>)>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DrugLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for (i, line) in reader.split(b'\n').enumerate().skip(1) {
        let line = line?;
        if !is_blank(&line) {
            lines.push((i + 1, line));
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::make_simple_line;
    use std::io::Cursor;

    fn dataset(lines: &[String]) -> Cursor<String> {
        let mut text = String::from("\"drugbank_id>,<...>,<structure\"\n");
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        Cursor::new(text)
    }

    #[test]
    fn test_header_is_skipped_and_lines_numbered() {
        let reader = dataset(&[
            make_simple_line("DB00001", "Lepirudin", ""),
            String::new(),
            make_simple_line("DB00002", "Cetuximab", ""),
        ]);

        let parser = DrugParser::from_reader(reader, LoadConfig::default()).unwrap();
        let records: Vec<_> = parser.map(Result::unwrap).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 2);
        assert_eq!(records[0].drug.id, "DB00001");
        assert_eq!(records[1].line, 4);
        assert_eq!(records[1].drug.name, "Cetuximab");
    }

    #[test]
    fn test_empty_input() {
        let parser = DrugParser::from_reader(Cursor::new(""), LoadConfig::default()).unwrap();
        let (records, skipped) = parser.parse_all().unwrap();
        assert!(records.is_empty());
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_malformed_line_aborts() {
        let reader = dataset(&[
            make_simple_line("DB00001", "Lepirudin", ""),
            "\"garbage\"".to_string(),
        ]);

        let parser = DrugParser::from_reader(reader, LoadConfig::default()).unwrap();
        match parser.parse_all() {
            Err(DrugLoadError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_line_skipped() {
        let reader = dataset(&[
            "\"garbage\"".to_string(),
            make_simple_line("DB00001", "Lepirudin", ""),
        ]);

        let parser = DrugParser::from_reader(reader, LoadConfig::lenient()).unwrap();
        let (records, skipped) = parser.parse_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_records_read_counter() {
        let reader = dataset(&[
            make_simple_line("DB00001", "Lepirudin", ""),
            make_simple_line("DB00002", "Cetuximab", ""),
        ]);
        let mut parser = DrugParser::from_reader(reader, LoadConfig::default()).unwrap();
        parser.next();
        assert_eq!(parser.records_read(), 1);
    }

    fn latin1_dataset() -> Cursor<Vec<u8>> {
        let mut bytes = b"\"drugbank_id>,<...>,<structure\"\n".to_vec();
        bytes.extend_from_slice(make_simple_line("DB00001", "Lepirudin", "").as_bytes());
        bytes.push(b'\n');
        // "Café" in Latin-1
        let latin1 = make_simple_line("DB00002", "Caf?", "")
            .into_bytes()
            .into_iter()
            .map(|b| if b == b'?' { 0xE9 } else { b });
        bytes.extend(latin1);
        bytes.push(b'\n');
        bytes.extend_from_slice(make_simple_line("DB00003", "Dornase alfa", "").as_bytes());
        bytes.push(b'\n');
        Cursor::new(bytes)
    }

    #[test]
    fn test_invalid_utf8_line_aborts_with_line_number() {
        let parser = DrugParser::from_reader(latin1_dataset(), LoadConfig::default()).unwrap();
        match parser.parse_all() {
            Err(DrugLoadError::Malformed { line, error }) => {
                assert_eq!(line, 3);
                assert!(matches!(error, MalformedRecord::InvalidEncoding { .. }));
            }
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_line_skipped() {
        let parser = DrugParser::from_reader(latin1_dataset(), LoadConfig::lenient()).unwrap();
        let (records, skipped) = parser.parse_all().unwrap();
        assert_eq!(skipped, 1);
        let lines: Vec<_> = records.iter().map(|r| (r.line, r.drug.id.as_str())).collect();
        assert_eq!(lines, vec![(2, "DB00001"), (4, "DB00003")]);
    }

    #[test]
    fn test_collect_records_policies() {
        let results = || {
            vec![
                parse_record(2, make_simple_line("DB00001", "Lepirudin", "").into_bytes()),
                parse_record(3, b"\"garbage\"".to_vec()),
                Err(DrugLoadError::Io(std::io::Error::other("disk gone"))),
            ]
        };

        match collect_records(results(), MalformedPolicy::Abort) {
            Err(DrugLoadError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected malformed error, got {other:?}"),
        }
        // I/O failures are never skipped
        assert!(matches!(
            collect_records(results(), MalformedPolicy::Skip),
            Err(DrugLoadError::Io(_))
        ));

        let (records, skipped) =
            collect_records(results().into_iter().take(2), MalformedPolicy::Skip).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_missing_file() {
        let result = DrugParser::from_path("/nonexistent/drugs.txt", LoadConfig::default());
        assert!(matches!(result, Err(DrugLoadError::FileNotFound { .. })));
    }
}
