// Primitives for reading tab-delimited demographic files.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Split};

use crate::tab::*;
use snafu::prelude::*;

/// The rows of a tab-delimited file, one per physical line.
///
/// A blank line is a row without any field. Quoted fields cannot span lines.
pub struct TabRows<R> {
    lines: Split<R>,
    parser: csv::ReaderBuilder,
    path: String,
    lineno: usize,
}

impl<R: BufRead> TabRows<R> {
    /// lines_before: the number of lines already consumed from the reader.
    pub fn new(reader: R, path: String, lines_before: usize) -> TabRows<R> {
        let mut parser = csv::ReaderBuilder::new();
        parser
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'));
        TabRows {
            lines: reader.split(b'\n'),
            parser,
            path,
            lineno: lines_before,
        }
    }

    fn parse(&self, line: &[u8]) -> csv::Result<csv::ByteRecord> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let mut record = csv::ByteRecord::new();
        if !line.is_empty() {
            self.parser.from_reader(line).read_byte_record(&mut record)?;
        }
        Ok(record)
    }
}

impl<R: BufRead> Iterator for TabRows<R> {
    /// The 1-based line number and the fields of the row.
    type Item = TallyResult<(usize, csv::ByteRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        let line_r = self.lines.next()?;
        self.lineno += 1;
        let lineno = self.lineno;
        let res = line_r
            .context(ReadingLineSnafu {
                path: &self.path,
                lineno,
            })
            .and_then(|line| {
                self.parse(&line).context(ParsingLineSnafu {
                    path: &self.path,
                    lineno,
                })
            });
        Some(res.map(|record| (lineno, record)))
    }
}

/// Opens a tab-delimited file and skips its first physical line.
///
/// The rows may have any number of fields. Only the ones referenced by the
/// column layout are checked, when the row gets recorded.
pub fn open_rows(path: &Path) -> TallyResult<TabRows<BufReader<File>>> {
    let p = path.display().to_string();
    let file = File::open(path).context(OpeningInputSnafu { path: &p })?;
    let mut reader = BufReader::new(file);
    // The header is never parsed nor validated.
    let mut header: Vec<u8> = Vec::new();
    reader
        .read_until(b'\n', &mut header)
        .context(ReadingLineSnafu {
            path: &p,
            lineno: 1_usize,
        })?;
    Ok(TabRows::new(reader, p, 1))
}

/// Records all the rows of one file. Returns the number of rows read.
pub fn tabulate_file(path: &Path, tabulator: &mut Tabulator) -> TallyResult<u64> {
    let p = path.display().to_string();
    info!("Attempting to read demographic file {:?}", p);
    let progress_interval = tabulator.rules().progress_interval;

    let mut num_rows: u64 = 0;
    for row_r in open_rows(path)? {
        let (lineno, line) = row_r?;
        // Non UTF-8 bytes are replaced instead of failing the whole run.
        let fields: Vec<Cow<str>> = line.iter().map(String::from_utf8_lossy).collect();
        tabulator
            .record(&fields)
            .with_context(|_| MalformedRowSnafu { path: &p, lineno })?;
        num_rows += 1;
        if progress_interval > 0 && num_rows % progress_interval == 0 {
            info!("{}: {} rows", simplify_file_name(path), num_rows);
        }
    }
    Ok(num_rows)
}
