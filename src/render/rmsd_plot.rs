// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Plot of RMSD of trajectory frames as a function of time.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_svg::SVGBackend;

use super::dashboard::DrawResult;
use super::palette::ColorScale;
use crate::auxiliary::padded_range;
use crate::errors::RenderError;
use crate::files::FileType;
use crate::structures::rmsd::RmsdSeries;

/// Writer of the RMSD plot into an SVG file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmsdPlot {
    path: PathBuf,
    size: (u32, u32),
}

impl RmsdPlot {
    /// Create a new writer of the RMSD plot into `path`.
    /// If the file does not have the `svg` extension, the extension is replaced.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = match FileType::from_name(path.as_ref()) {
            FileType::SVG => path.as_ref().to_path_buf(),
            _ => path.as_ref().with_extension("svg"),
        };

        RmsdPlot {
            path,
            size: (1000, 500),
        }
    }

    /// Create new `RmsdPlot` with specific size of the image (in pixels).
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Path to the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Draw the RMSD series into the output file.
    pub fn render(&self, series: &RmsdSeries) -> Result<(), RenderError> {
        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        draw_rmsd(&root, series).map_err(|e| RenderError::DrawingFailed(e.to_string()))
    }
}

/// RMSD as a line over time with points colored by the RMSD value.
pub(crate) fn draw_rmsd<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &RmsdSeries,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let (x_min, x_max) = padded_range(series.time().iter().copied());
    let (y_min, y_max) = padded_range(series.rmsd().iter().copied());

    let mut chart = ChartBuilder::on(root)
        .caption("RMSD", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("time (ns)")
        .y_desc("RMSD (nm)")
        .draw()?;

    chart.draw_series(LineSeries::new(series.points(), &BLACK))?;

    let scale = ColorScale::from_values(series.rmsd().iter().copied());
    chart.draw_series(
        series
            .points()
            .map(|(time, rmsd)| Circle::new((time, rmsd), 2, scale.color(rmsd).filled())),
    )?;

    root.present()?;
    Ok(())
}

/******************************/
/*         UNIT TESTS         */
/******************************/
