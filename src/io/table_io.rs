// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Implementation of a reader for whitespace-delimited numeric tables (plain text and xvg files).

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use ndarray::Array2;

use crate::auxiliary::{is_blank_or_comment, parse_numeric_line};
use crate::errors::ReadTableError;

/// Read a whitespace-delimited numeric table.
///
/// ## Returns
/// - `Array2` with one row per data line of the file.
/// - `ReadTableError` if the file does not exist, contains a non-numeric field,
///   has rows of different lengths, or contains no data.
///
/// ## Notes
/// - Empty lines and lines starting with `#` or `@` are skipped,
///   so xvg files written by Gromacs tools can be read directly.
pub fn read_table(filename: impl AsRef<Path>) -> Result<Array2<f64>, ReadTableError> {
    let file = match File::open(filename.as_ref()) {
        Ok(x) => x,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ReadTableError::FileNotFound(Box::from(filename.as_ref())))
        }
        Err(_) => return Err(ReadTableError::CouldNotRead(Box::from(filename.as_ref()))),
    };

    let buffer = BufReader::new(file);

    let mut values = Vec::new();
    let mut n_columns = None;
    let mut n_rows = 0usize;

    for raw_line in buffer.lines() {
        let line = match raw_line {
            Ok(x) => x,
            Err(_) => return Err(ReadTableError::CouldNotRead(Box::from(filename.as_ref()))),
        };

        if is_blank_or_comment(&line) {
            continue;
        }

        let row = parse_numeric_line(&line).ok_or(ReadTableError::ParseLineErr(line.clone()))?;

        match n_columns {
            None => n_columns = Some(row.len()),
            Some(n) if n != row.len() => return Err(ReadTableError::ColumnMismatch(line)),
            Some(_) => (),
        }

        values.extend(row);
        n_rows += 1;
    }

    let n_columns = match n_columns {
        Some(n) => n,
        None => return Err(ReadTableError::Empty(Box::from(filename.as_ref()))),
    };

    Ok(Array2::from_shape_vec((n_rows, n_columns), values)
        .expect("FATAL HILLWATCH ERROR | table_io::read_table | Number of values does not match the table shape."))
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tmp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn read_plain() {
        let file = write_tmp("0.5 1.5\n\n-1.0 2.0\n3.0 4.0e1\n");
        let table = read_table(file.path()).unwrap();

        assert_eq!(table.dim(), (3, 2));
        assert_approx_eq!(f64, table[[0, 0]], 0.5);
        assert_approx_eq!(f64, table[[1, 0]], -1.0);
        assert_approx_eq!(f64, table[[2, 1]], 40.0);
    }

    #[test]
    fn read_xvg() {
        let file = write_tmp(
            "# This file was created by gmx rms\n\
             @    title \"RMSD\"\n\
             @    xaxis  label \"Time (ns)\"\n\
             @TYPE xy\n\
             0.000    0.0005\n\
             0.010    0.0921\n",
        );
        let table = read_table(file.path()).unwrap();

        assert_eq!(table.dim(), (2, 2));
        assert_approx_eq!(f64, table[[1, 0]], 0.01);
        assert_approx_eq!(f64, table[[1, 1]], 0.0921);
    }

    #[test]
    fn read_nonexistent() {
        match read_table("test_files/nonexistent.dat") {
            Err(ReadTableError::FileNotFound(path)) => {
                assert_eq!(path.to_str().unwrap(), "test_files/nonexistent.dat")
            }
            _ => panic!("Reading should have failed."),
        }
    }

    #[cfg(unix)]
    #[test]
    fn read_unopenable() {
        let file = write_tmp("0.5 1.5\n");
        let path = file.path().join("table.dat");

        assert_eq!(
            read_table(&path),
            Err(ReadTableError::CouldNotRead(Box::from(path.as_path())))
        );
    }

    #[test]
    fn read_unparsable() {
        let file = write_tmp("0.5 1.5\n0.5 x\n");
        assert_eq!(
            read_table(file.path()),
            Err(ReadTableError::ParseLineErr("0.5 x".to_string()))
        );
    }

    #[test]
    fn read_inconsistent() {
        let file = write_tmp("0.5 1.5\n0.5 1.5 2.5\n");
        assert_eq!(
            read_table(file.path()),
            Err(ReadTableError::ColumnMismatch("0.5 1.5 2.5".to_string()))
        );
    }

    #[test]
    fn read_empty() {
        let file = write_tmp("# only a comment\n\n");
        match read_table(file.path()) {
            Err(ReadTableError::Empty(_)) => (),
            _ => panic!("Reading should have failed."),
        }
    }
}
