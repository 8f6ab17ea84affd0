// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Implementation of incremental reading of HILLS files written by PLUMED.
//!
//! HILLS files are append-only. `HillsTail` remembers how much of the file
//! has already been consumed and only parses rows that were appended since the last read.

use std::fs::{File, Metadata};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use getset::{CopyGetters, Getters};
use ndarray::Array2;

use crate::auxiliary::{is_blank_or_comment, parse_numeric_line, HILLS_MIN_COLUMNS};
use crate::errors::ReadHillsError;
use crate::structures::hills::HillsSeries;

/// Position in the HILLS file up to which the rows have been consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, CopyGetters)]
pub struct ReadCursor {
    /// Number of data rows consumed. Always equal to the length of the accumulated series.
    #[getset(get_copy = "pub")]
    rows: usize,
    /// Byte offset of the end of the last consumed line.
    #[getset(get_copy = "pub")]
    offset: u64,
    /// Identity of the file the rows were consumed from.
    identity: Option<FileIdentity>,
}

/// Device and inode of a file. Changes when the file is replaced by a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity {
    device: u64,
    inode: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    fn of(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;

        Some(FileIdentity {
            device: metadata.dev(),
            inode: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    fn of(_metadata: &Metadata) -> Option<Self> {
        None
    }
}

/// Result of a single poll of a HILLS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HillsPoll {
    /// The file does not exist (yet).
    Missing,
    /// No complete rows were appended since the last poll.
    Unchanged,
    /// The given number of rows was appended to the series.
    Appended(usize),
}

/// Incremental reader of a HILLS file owning the accumulated series.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct HillsTail {
    /// Path to the HILLS file.
    #[getset(get = "pub")]
    path: PathBuf,
    /// Consumed part of the file.
    #[getset(get_copy = "pub")]
    cursor: ReadCursor,
    /// All rows read so far.
    #[getset(get = "pub")]
    series: HillsSeries,
}

impl HillsTail {
    /// Create a new reader for the HILLS file. The file does not have to exist yet.
    pub fn new(filename: impl AsRef<Path>) -> Self {
        HillsTail {
            path: filename.as_ref().to_path_buf(),
            cursor: ReadCursor::default(),
            series: HillsSeries::new(),
        }
    }

    /// Read rows appended to the HILLS file since the last poll.
    ///
    /// ## Returns
    /// - `HillsPoll::Missing` if the file does not exist.
    /// - `HillsPoll::Unchanged` if no complete line was appended.
    /// - `HillsPoll::Appended` with the number of new rows.
    /// - `ReadHillsError` if the newly appended part could not be read or parsed.
    ///
    /// ## Notes
    /// - The last line of the file is only consumed once it is terminated by a newline
    ///   character: an unterminated line is assumed to be still written by PLUMED.
    /// - A file that was replaced (a different file now exists at the path, or the consumed part
    ///   no longer ends with a complete line) is reported as `ReadHillsError::Replaced`
    ///   and a file shorter than the consumed part as `ReadHillsError::Truncated`.
    ///   The already accumulated series is kept in both cases.
    /// - If an error occurs, neither the cursor nor the series is changed, so
    ///   the same part of the file is read again during the next poll.
    /// - Empty lines and comment lines (e.g., `#! FIELDS ...`) are skipped
    ///   and do not count as rows.
    pub fn poll(&mut self) -> Result<HillsPoll, ReadHillsError> {
        let mut file = match File::open(&self.path) {
            Ok(x) => x,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HillsPoll::Missing),
            Err(_) => return Err(ReadHillsError::CouldNotOpen(Box::from(self.path.as_path()))),
        };

        let metadata = file
            .metadata()
            .map_err(|_| ReadHillsError::CouldNotRead(Box::from(self.path.as_path())))?;
        let length = metadata.len();
        let identity = FileIdentity::of(&metadata);

        if length < self.cursor.offset {
            return Err(ReadHillsError::Truncated(
                Box::from(self.path.as_path()),
                length,
                self.cursor.offset,
            ));
        }

        if self.cursor.offset > 0
            && self.cursor.identity.is_some()
            && identity != self.cursor.identity
        {
            return Err(ReadHillsError::Replaced(Box::from(self.path.as_path())));
        }

        if length == self.cursor.offset {
            return Ok(HillsPoll::Unchanged);
        }

        // the last consumed byte is read again to check that the file still ends a line there
        let mut bytes = Vec::new();
        file.seek(SeekFrom::Start(self.cursor.offset.saturating_sub(1)))
            .and_then(|_| file.read_to_end(&mut bytes))
            .map_err(|_| ReadHillsError::CouldNotRead(Box::from(self.path.as_path())))?;

        let appended = if self.cursor.offset == 0 {
            &bytes[..]
        } else {
            match bytes.split_first() {
                Some((b'\n', rest)) => rest,
                _ => return Err(ReadHillsError::Replaced(Box::from(self.path.as_path()))),
            }
        };

        let complete = match appended.iter().rposition(|&byte| byte == b'\n') {
            Some(last_newline) => &appended[..=last_newline],
            None => return Ok(HillsPoll::Unchanged),
        };

        let text = std::str::from_utf8(complete)
            .map_err(|_| ReadHillsError::InvalidUtf8(Box::from(self.path.as_path())))?;

        let block = parse_hills_block(text, self.series.n_columns())?;
        let n_new = block.nrows();

        self.series.append(block);
        self.cursor.rows += n_new;
        self.cursor.offset += complete.len() as u64;
        self.cursor.identity = identity;

        if n_new == 0 {
            Ok(HillsPoll::Unchanged)
        } else {
            Ok(HillsPoll::Appended(n_new))
        }
    }
}

/// Read a complete HILLS file at once.
///
/// ## Returns
/// `HillsSeries` containing all rows of the file or `ReadHillsError` if the file could not be read or parsed.
///
/// ## Notes
/// - Unlike `HillsTail::poll`, the last line is read even if it is not terminated by a newline character.
pub fn read_hills(filename: impl AsRef<Path>) -> Result<HillsSeries, ReadHillsError> {
    let path = filename.as_ref();

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ReadHillsError::CouldNotOpen(Box::from(path)),
        _ => ReadHillsError::CouldNotRead(Box::from(path)),
    })?;

    let text = std::str::from_utf8(&bytes)
        .map_err(|_| ReadHillsError::InvalidUtf8(Box::from(path)))?;

    Ok(HillsSeries::from(parse_hills_block(text, None)?))
}

/// Parse complete lines of a HILLS file into a block of rows.
///
/// `expected_columns` is the number of columns of the already accumulated rows, if any.
pub fn parse_hills_block(
    text: &str,
    expected_columns: Option<usize>,
) -> Result<Array2<f64>, ReadHillsError> {
    let mut n_columns = expected_columns;
    let mut n_rows = 0usize;
    let mut values = Vec::new();

    for line in text.lines() {
        if is_blank_or_comment(line) {
            continue;
        }

        let row = parse_numeric_line(line)
            .ok_or_else(|| ReadHillsError::ParseLineErr(line.trim().to_string()))?;

        if row.len() < HILLS_MIN_COLUMNS {
            return Err(ReadHillsError::TooFewColumns(line.trim().to_string()));
        }

        match n_columns {
            None => n_columns = Some(row.len()),
            Some(n) if n != row.len() => {
                return Err(ReadHillsError::ColumnMismatch(
                    n,
                    line.trim().to_string(),
                    row.len(),
                ))
            }
            Some(_) => (),
        }

        values.extend(row);
        n_rows += 1;
    }

    Ok(
        Array2::from_shape_vec((n_rows, n_columns.unwrap_or(0)), values).expect(
            "FATAL HILLWATCH ERROR | hills_io::parse_hills_block | Number of values does not match the block shape.",
        ),
    )
}

/******************************/
/*         UNIT TESTS         */
/******************************/
