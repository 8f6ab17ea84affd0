// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Implementation of the reference latent space: low-dimensional projection of a reference
//! trajectory with the RMSD of each frame from the reference structure.

use std::path::Path;

use ndarray::{s, Array1, Array2, ArrayView1, Axis};

use crate::errors::ReferenceError;
use crate::files::FileType;
use crate::io::table_io::read_table;
use crate::structures::rmsd::{RmsdReference, RmsdSeries};

/// Low-dimensional (2D) projection of a reference trajectory.
/// Loaded once before monitoring starts and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLatentSpace {
    /// Points of the projection, one row per frame.
    points: Array2<f64>,
    /// RMSD of each frame from the reference structure.
    rmsd: Array1<f64>,
}

impl ReferenceLatentSpace {
    /// Construct the latent space from points (N x 2) and the RMSD of each point.
    ///
    /// ## Returns
    /// `ReferenceError::LengthMismatch` if the number of points and RMSD values differ.
    ///
    /// ## Panics
    /// Panics if `points` does not have exactly two columns.
    pub fn new(points: Array2<f64>, rmsd: Array1<f64>) -> Result<Self, ReferenceError> {
        assert_eq!(
            points.ncols(),
            2,
            "FATAL HILLWATCH ERROR | ReferenceLatentSpace::new | Points must have exactly two columns."
        );

        if points.nrows() != rmsd.len() {
            return Err(ReferenceError::LengthMismatch(points.nrows(), rmsd.len()));
        }

        Ok(ReferenceLatentSpace { points, rmsd })
    }

    /// Latent space containing no points. Used when no reference data is available.
    pub fn empty() -> Self {
        ReferenceLatentSpace {
            points: Array2::zeros((0, 2)),
            rmsd: Array1::zeros(0),
        }
    }

    /// Load the latent space from a file with the low-dimensional projection
    /// and a file with the RMSD values.
    ///
    /// ## Parameters
    /// - `lows`: whitespace-delimited table; the first two columns are used as coordinates
    /// - `rmsd`: either an xvg file written by `gmx rms` (second column is used)
    ///   or a plain table (last column is used)
    ///
    /// ## Returns
    /// `ReferenceError` if any of the files could not be read or the files do not match.
    pub fn from_files(
        lows: impl AsRef<Path>,
        rmsd: impl AsRef<Path>,
    ) -> Result<Self, ReferenceError> {
        let points = read_lows(lows)?;
        let rmsd = read_rmsd(rmsd)?;

        ReferenceLatentSpace::new(points, rmsd)
    }

    /// Load the latent space from a file with the low-dimensional projection
    /// and calculate the RMSD of each point from the frames of the reference trajectory.
    ///
    /// ## Parameters
    /// - `lows`: whitespace-delimited table; the first two columns are used as coordinates
    /// - `structure`: reference structure; RMSD of each frame is calculated relative to it
    /// - `trajectory`: xtc trajectory with one frame per point of the projection
    /// - `selection`: atoms used for the RMSD calculation
    ///
    /// ## Returns
    /// `ReferenceError` if any of the files could not be read, the RMSD could not be calculated,
    /// or the number of frames does not match the number of points.
    pub fn from_trajectory(
        lows: impl AsRef<Path>,
        structure: impl AsRef<Path>,
        trajectory: impl AsRef<Path>,
        selection: &str,
    ) -> Result<Self, ReferenceError> {
        let points = read_lows(lows)?;
        let series =
            RmsdSeries::from_trajectory(structure, trajectory, selection, RmsdReference::Structure)
                .map_err(ReferenceError::Rmsd)?;

        ReferenceLatentSpace::new(points, series.rmsd().to_owned())
    }

    /// Load the latent space from a file with the low-dimensional projection only.
    /// RMSD of all points is set to zero.
    pub fn from_lows(lows: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let points = read_lows(lows)?;
        let rmsd = Array1::zeros(points.nrows());

        ReferenceLatentSpace::new(points, rmsd)
    }

    /// Number of points in the latent space.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    /// Returns `true` if the latent space contains no points.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Iterate over the points of the latent space.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.axis_iter(Axis(0)).map(|p| (p[0], p[1]))
    }

    /// RMSD of each point.
    pub fn rmsd(&self) -> ArrayView1<'_, f64> {
        self.rmsd.view()
    }

    /// First point of the latent space which corresponds to the reference structure.
    pub fn reference_point(&self) -> Option<(f64, f64)> {
        self.points().next()
    }
}

/// Read the first two columns of a latent space file.
fn read_lows(filename: impl AsRef<Path>) -> Result<Array2<f64>, ReferenceError> {
    let table = read_table(filename.as_ref()).map_err(ReferenceError::ReadError)?;

    if table.ncols() < 2 {
        return Err(ReferenceError::TooFewColumns(Box::from(filename.as_ref())));
    }

    Ok(table.slice(s![.., 0..2]).to_owned())
}

/// Read RMSD values from an xvg file or a plain table.
fn read_rmsd(filename: impl AsRef<Path>) -> Result<Array1<f64>, ReferenceError> {
    let table = read_table(filename.as_ref()).map_err(ReferenceError::ReadError)?;

    let column = match FileType::from_name(filename.as_ref()) {
        FileType::XVG if table.ncols() >= 2 => 1,
        _ => table.ncols() - 1,
    };

    Ok(table.column(column).to_owned())
}

/******************************/
/*         UNIT TESTS         */
/******************************/
