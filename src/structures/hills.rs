// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Implementation of the HillsSeries structure: rows of a HILLS file accumulated in memory.

use getset::Getters;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::auxiliary::{HILLS_CV1, HILLS_CV2, HILLS_HEIGHT, HILLS_TIME, PS_PER_NS};

/// Append-only series of rows read from a HILLS file.
///
/// All rows share the same number of columns (at least 6).
/// Once a row is added into the series, it is never modified nor removed.
#[derive(Debug, Clone, PartialEq)]
pub struct HillsSeries {
    rows: Array2<f64>,
}

impl HillsSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        HillsSeries {
            rows: Array2::zeros((0, 0)),
        }
    }

    /// Number of rows in the series.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rows.nrows()
    }

    /// Returns `true` if the series contains no rows.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rows.nrows() == 0
    }

    /// Number of columns of each row. Returns `None` if the series is empty.
    pub fn n_columns(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.rows.ncols())
        }
    }

    /// View of all rows of the series.
    pub fn rows(&self) -> ArrayView2<'_, f64> {
        self.rows.view()
    }

    /// View of a single row of the series.
    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        if index < self.len() {
            Some(self.rows.row(index))
        } else {
            None
        }
    }

    /// Append a block of rows at the end of the series.
    ///
    /// ## Panics
    /// Panics if the number of columns of the block does not match the series.
    /// Callers are expected to validate the block before appending.
    pub(crate) fn append(&mut self, block: Array2<f64>) {
        if block.nrows() == 0 {
            return;
        }

        if self.is_empty() {
            self.rows = block;
            return;
        }

        self.rows
            .append(Axis(0), block.view())
            .expect("FATAL HILLWATCH ERROR | HillsSeries::append | Column count of the block does not match the series.");
    }

    /// Extract the columns needed for visualization.
    /// Time is converted from ps to ns.
    pub fn slices(&self) -> HillsSlices {
        if self.is_empty() {
            return HillsSlices::default();
        }

        HillsSlices {
            time: self.rows.column(HILLS_TIME).mapv(|t| t / PS_PER_NS),
            cv1: self.rows.column(HILLS_CV1).to_owned(),
            cv2: self.rows.column(HILLS_CV2).to_owned(),
            height: self.rows.column(HILLS_HEIGHT).to_owned(),
        }
    }
}

impl Default for HillsSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Array2<f64>> for HillsSeries {
    fn from(rows: Array2<f64>) -> Self {
        HillsSeries { rows }
    }
}

/// Columns of a HillsSeries used for visualization.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct HillsSlices {
    /// Time of hill deposition in ns.
    #[getset(get = "pub")]
    time: Array1<f64>,
    /// First collective variable.
    #[getset(get = "pub")]
    cv1: Array1<f64>,
    /// Second collective variable.
    #[getset(get = "pub")]
    cv2: Array1<f64>,
    /// Height of the deposited hill.
    #[getset(get = "pub")]
    height: Array1<f64>,
}

impl HillsSlices {
    /// Number of points in the slices.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns `true` if the slices contain no points.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Points in the (cv1, cv2) plane.
    pub fn cv_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.cv1.iter().copied().zip(self.cv2.iter().copied())
    }
}

impl Default for HillsSlices {
    fn default() -> Self {
        HillsSlices {
            time: Array1::zeros(0),
            cv1: Array1::zeros(0),
            cv2: Array1::zeros(0),
            height: Array1::zeros(0),
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
