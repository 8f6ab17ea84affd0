// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Error types returned by the `hillwatch` library.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur when reading rows appended to a HILLS file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadHillsError {
    #[error("File `{0}` could not be opened.")]
    CouldNotOpen(Box<Path>),
    #[error("File `{0}` could not be read.")]
    CouldNotRead(Box<Path>),
    #[error("File `{0}` contains invalid UTF-8.")]
    InvalidUtf8(Box<Path>),
    #[error("Could not parse line `{0}`.")]
    ParseLineErr(String),
    #[error("Line `{0}` contains fewer than 6 columns.")]
    TooFewColumns(String),
    #[error("Expected {0} columns, line `{1}` has {2}.")]
    ColumnMismatch(usize, String, usize),
    #[error("File `{0}` is shorter ({1} bytes) than the already consumed part ({2} bytes).")]
    Truncated(Box<Path>, u64, u64),
    #[error("File `{0}` was replaced by a different file since the last read.")]
    Replaced(Box<Path>),
}

/// Errors that can occur when reading a Gromacs log file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadLogError {
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("File `{0}` could not be read.")]
    CouldNotRead(Box<Path>),
}

/// Errors that can occur when reading a whitespace-delimited numeric table (incl. xvg files).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadTableError {
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("File `{0}` could not be read.")]
    CouldNotRead(Box<Path>),
    #[error("Could not parse line `{0}`.")]
    ParseLineErr(String),
    #[error("Line `{0}` does not have the same number of columns as the previous lines.")]
    ColumnMismatch(String),
    #[error("File `{0}` contains no data.")]
    Empty(Box<Path>),
}

/// Errors that can occur when constructing the reference latent space.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("{}", .0)]
    ReadError(ReadTableError),
    #[error("Latent space file `{0}` must contain at least 2 columns.")]
    TooFewColumns(Box<Path>),
    #[error("Latent space contains {0} points but {1} RMSD values were provided.")]
    LengthMismatch(usize, usize),
    #[error("{}", .0)]
    Rmsd(RmsdError),
}

/// Errors that can occur when calculating RMSD of trajectory frames.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RmsdError {
    #[error("Structure file `{0}` could not be loaded ({1}).")]
    CouldNotLoad(Box<Path>, String),
    #[error("Selection `{0}` is invalid ({1}).")]
    InvalidSelection(String, String),
    #[error("Trajectory file `{0}` is not an xtc file.")]
    UnsupportedTrajectory(Box<Path>),
    #[error("Trajectory file `{0}` could not be read ({1}).")]
    CouldNotReadTrajectory(Box<Path>, String),
    #[error("RMSD could not be calculated ({0}).")]
    CalculationFailed(String),
    #[error("Trajectory file `{0}` contains no frames.")]
    EmptyTrajectory(Box<Path>),
}

/// Errors that can occur when loading or validating the monitor configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("File `{0}` could not be read.")]
    CouldNotRead(Box<Path>),
    #[error("Could not parse configuration file `{0}`: {1}")]
    ParseErr(Box<Path>, String),
}

/// Errors that can occur when rendering the state of the simulation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("Could not write to the output stream.")]
    CouldNotWrite,
    #[error("Could not create file `{0}`.")]
    CouldNotCreate(Box<Path>),
    #[error("Drawing failed: {0}")]
    DrawingFailed(String),
    #[error("Stride must be larger than zero.")]
    InvalidStride,
}

/// Errors that can occur when preparing (centering and fitting) the trajectory.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PrepareError {
    #[error("Could not start `{0}`: {1}")]
    CouldNotSpawn(String, String),
    #[error("Could not pass group selection to `{0}`.")]
    CouldNotFeedInput(String),
    #[error("`{0}` failed with exit status `{1}`.")]
    CommandFailed(String, String),
}

/// Transient errors encountered during a single poll of the simulation output files.
/// These never stop the monitoring; they are reported and the poll is repeated in the next cycle.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PollError {
    #[error("{}", .0)]
    Hills(ReadHillsError),
    #[error("{}", .0)]
    Log(ReadLogError),
}
