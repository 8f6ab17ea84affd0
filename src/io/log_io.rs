// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Implementation of functions for extracting the simulation progress from Gromacs log files.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use getset::CopyGetters;

use crate::auxiliary::PS_PER_NS;
use crate::errors::ReadLogError;

/// Size of the log file tail searched first. Doubled until the progress is found.
const TAIL_CHUNK: u64 = 64 * 1024;

/// Simulation step and time most recently reported in the log file.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
pub struct LoggedProgress {
    /// Simulation step.
    #[getset(get_copy = "pub")]
    step: u64,
    /// Simulation time in ps.
    #[getset(get_copy = "pub")]
    time: f64,
}

impl LoggedProgress {
    /// Create new `LoggedProgress`. `time` is in ps.
    pub fn new(step: u64, time: f64) -> Self {
        LoggedProgress { step, time }
    }

    /// Simulation time in ns.
    #[inline(always)]
    pub fn time_ns(&self) -> f64 {
        self.time / PS_PER_NS
    }
}

/// Find the most recent simulation step and time reported in a Gromacs log file.
///
/// ## Returns
/// - `Some(LoggedProgress)` if a progress report was found.
/// - `None` if the file contains no complete progress report.
/// - `ReadLogError` if the file does not exist or could not be read.
///
/// ## Notes
/// - Only the end of the file is read, unless the progress report is located further back.
/// - See [`parse_last_progress`] for the recognized format.
pub fn read_last_progress(
    filename: impl AsRef<Path>,
) -> Result<Option<LoggedProgress>, ReadLogError> {
    let mut file = match File::open(filename.as_ref()) {
        Ok(x) => x,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ReadLogError::FileNotFound(Box::from(filename.as_ref())))
        }
        Err(_) => return Err(ReadLogError::CouldNotRead(Box::from(filename.as_ref()))),
    };

    let length = file
        .metadata()
        .map_err(|_| ReadLogError::CouldNotRead(Box::from(filename.as_ref())))?
        .len();

    let mut chunk = TAIL_CHUNK;
    loop {
        let start = length.saturating_sub(chunk);

        let mut bytes = Vec::new();
        file.seek(SeekFrom::Start(start))
            .and_then(|_| file.read_to_end(&mut bytes))
            .map_err(|_| ReadLogError::CouldNotRead(Box::from(filename.as_ref())))?;

        // the chunk may start in the middle of a multi-byte character
        let text = String::from_utf8_lossy(&bytes);
        if let Some(progress) = parse_last_progress(&text) {
            return Ok(Some(progress));
        }

        if start == 0 {
            return Ok(None);
        }

        chunk = chunk.saturating_mul(2);
    }
}

/// Find the last progress report in the text of a Gromacs log file.
///
/// A progress report consists of a header line containing both `Step` and `Time`
/// immediately followed by a line with exactly two numbers: the simulation step and
/// the simulation time (in ps):
/// ```text
///            Step           Time
///          500000     1000.00000
/// ```
///
/// Headers that are not followed by a valid data line (e.g., because the data line
/// is still being written) are ignored and the search continues towards the start of the text.
pub fn parse_last_progress(text: &str) -> Option<LoggedProgress> {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate().rev() {
        if !(line.contains("Step") && line.contains("Time")) {
            continue;
        }

        if let Some(progress) = lines.get(i + 1).and_then(|next| parse_progress_line(next)) {
            return Some(progress);
        }
    }

    None
}

/// Parse a line containing simulation step and simulation time.
fn parse_progress_line(line: &str) -> Option<LoggedProgress> {
    let mut fields = line.split_whitespace();
    let step = fields.next()?.parse::<u64>().ok()?;
    let time = fields.next()?.parse::<f64>().ok()?;

    if fields.next().is_some() {
        return None;
    }

    Some(LoggedProgress::new(step, time))
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::utilities::append_to_file;
    use float_cmp::assert_approx_eq;
    use tempfile::TempDir;

    const LOG_EXCERPT: &str = "\
Started mdrun on rank 0 Mon Jan  6 10:00:00 2025

           Step           Time
              0        0.00000

   Energies (kJ/mol)
          Angle    Proper Dih.  Ryckaert-Bell.          LJ-14     Coulomb-14
    9.74139e+03    4.34956e+02    2.25248e+03    2.94100e+03    4.11718e+04

           Step           Time
          50000      100.00000

   Energies (kJ/mol)
          Angle    Proper Dih.  Ryckaert-Bell.          LJ-14     Coulomb-14
    9.61245e+03    4.35118e+02    2.21913e+03    2.92374e+03    4.11203e+04
";

    #[test]
    fn parse_minimal() {
        let progress = parse_last_progress("Step Time\n1000 500.0\n").unwrap();
        assert_eq!(progress.step(), 1000);
        assert_approx_eq!(f64, progress.time(), 500.0);
        assert_approx_eq!(f64, progress.time_ns(), 0.5);
    }

    #[test]
    fn parse_takes_last() {
        let progress = parse_last_progress(LOG_EXCERPT).unwrap();
        assert_eq!(progress.step(), 50000);
        assert_approx_eq!(f64, progress.time(), 100.0);
    }

    #[test]
    fn parse_header_without_data() {
        let text = format!("{}\n           Step           Time\n", LOG_EXCERPT);
        let progress = parse_last_progress(&text).unwrap();
        assert_eq!(progress.step(), 50000);
    }

    #[test]
    fn parse_header_with_partial_data() {
        let text = format!("{}\n           Step           Time\n          1000", LOG_EXCERPT);
        let progress = parse_last_progress(&text).unwrap();
        assert_eq!(progress.step(), 50000);
    }

    #[test]
    fn parse_no_pattern() {
        assert_eq!(parse_last_progress(""), None);
        assert_eq!(parse_last_progress("Step 1000\nTime 500.0\n"), None);
        assert_eq!(parse_last_progress("Step Time\n"), None);
        assert_eq!(parse_last_progress("Step Time\nabc def\n"), None);
    }

    #[test]
    fn read_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("md.log");
        append_to_file(&path, LOG_EXCERPT);

        let progress = read_last_progress(&path).unwrap().unwrap();
        assert_eq!(progress, LoggedProgress::new(50000, 100.0));
    }

    #[test]
    fn read_far_from_the_end() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("md.log");
        append_to_file(&path, "           Step           Time\n          25000       50.00000\n");

        // push the report out of the first searched chunk
        let filler = "    9.61245e+03    4.35118e+02    2.21913e+03    2.92374e+03\n".repeat(5000);
        append_to_file(&path, &filler);

        let progress = read_last_progress(&path).unwrap().unwrap();
        assert_eq!(progress, LoggedProgress::new(25000, 50.0));
    }

    #[test]
    fn read_without_progress() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("md.log");
        append_to_file(&path, "Started mdrun on rank 0\n");

        assert_eq!(read_last_progress(&path), Ok(None));
    }

    #[test]
    fn read_nonexistent() {
        match read_last_progress("test_files/nonexistent.log") {
            Err(ReadLogError::FileNotFound(path)) => {
                assert_eq!(path.to_str().unwrap(), "test_files/nonexistent.log")
            }
            _ => panic!("Reading should have failed."),
        }
    }

    #[cfg(unix)]
    #[test]
    fn read_unopenable() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("md.log");
        std::fs::write(&file, "").unwrap();

        // a regular file used as a directory
        let path = file.join("md.log");
        assert_eq!(
            read_last_progress(&path),
            Err(ReadLogError::CouldNotRead(Box::from(path.as_path())))
        );
    }

    #[cfg(unix)]
    #[test]
    fn read_directory() {
        let dir = TempDir::new().unwrap();

        assert_eq!(
            read_last_progress(dir.path()),
            Err(ReadLogError::CouldNotRead(Box::from(dir.path())))
        );
    }
}
