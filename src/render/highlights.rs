// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Replay of the exploration of the collective variable space as a series of SVG frames.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_svg::SVGBackend;

use super::dashboard::DrawResult;
use super::palette::ColorScale;
use crate::auxiliary::padded_range;
use crate::errors::RenderError;
use crate::structures::hills::{HillsSeries, HillsSlices};

/// Color of the full explored space drawn in the background.
const BACKGROUND_GRAY: RGBColor = RGBColor(190, 190, 190);

/// Writer of highlight frames. Frame `i` shows all explored points in gray
/// and the points explored up to the `i * stride`th hill colored by time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlights {
    directory: PathBuf,
    prefix: String,
    stride: usize,
    size: (u32, u32),
}

impl Highlights {
    /// Create a new writer of highlight frames into `directory`.
    ///
    /// Default parameters:
    /// - `prefix`: `highlight` (frames are named `highlight_00000.svg`, `highlight_00001.svg`, ...)
    /// - `stride`: `1000` (hills between two frames)
    /// - `size`: `1000 x 500` pixels
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Highlights {
            directory: directory.as_ref().to_path_buf(),
            prefix: String::from("highlight"),
            stride: 1000,
            size: (1000, 500),
        }
    }

    /// Create new `Highlights` with specific file name prefix.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_owned();
        self
    }

    /// Create new `Highlights` with specific number of hills between two frames.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Create new `Highlights` with specific size of the frames (in pixels).
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Indices of the last hill shown in each frame.
    pub fn frame_ends(&self, n_hills: usize) -> Result<Vec<usize>, RenderError> {
        if self.stride == 0 {
            return Err(RenderError::InvalidStride);
        }

        Ok((0..n_hills).step_by(self.stride).collect())
    }

    /// Write the highlight frames for the series.
    ///
    /// ## Returns
    /// Paths to the written frames (in order) or `RenderError` if writing failed.
    ///
    /// ## Notes
    /// - The output directory is created if it does not exist.
    /// - An empty series produces no frames.
    pub fn render(&self, series: &HillsSeries) -> Result<Vec<PathBuf>, RenderError> {
        let ends = self.frame_ends(series.len())?;
        if ends.is_empty() {
            return Ok(Vec::new());
        }

        std::fs::create_dir_all(&self.directory)
            .map_err(|_| RenderError::CouldNotCreate(Box::from(self.directory.as_path())))?;

        let slices = series.slices();
        let mut written = Vec::with_capacity(ends.len());

        for (index, &end) in ends.iter().enumerate() {
            let path = self
                .directory
                .join(format!("{}_{:05}.svg", self.prefix, index));

            let root = SVGBackend::new(&path, self.size).into_drawing_area();
            draw_frame(&root, &slices, end)
                .map_err(|e| RenderError::DrawingFailed(e.to_string()))?;
            drop(root);

            written.push(path);
        }

        Ok(written)
    }
}

/// Draw a single frame showing the points up to (and including) `end`.
pub(crate) fn draw_frame<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    slices: &HillsSlices,
    end: usize,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let (x_min, x_max) = padded_range(slices.cv1().iter().copied());
    let (y_min, y_max) = padded_range(slices.cv2().iter().copied());

    let mut chart = ChartBuilder::on(root)
        .caption(format!("{:.0} ns", slices.time()[end]), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc("cv1").y_desc("cv2").draw()?;

    chart.draw_series(
        slices
            .cv_points()
            .map(|point| Circle::new(point, 1, BACKGROUND_GRAY.filled())),
    )?;

    // color scale spans the shown part only
    let scale = ColorScale::from_values(slices.time().iter().take(end + 1).copied());
    chart.draw_series(
        slices
            .cv_points()
            .zip(slices.time().iter())
            .take(end + 1)
            .map(|(point, &time)| Circle::new(point, 1, scale.color(time).filled())),
    )?;

    root.present()?;
    Ok(())
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use tempfile::TempDir;

    fn series(n: usize) -> HillsSeries {
        let mut rows = Array2::zeros((n, 7));
        for i in 0..n {
            rows[[i, 0]] = i as f64 * 1000.0;
            rows[[i, 1]] = (i as f64).sin();
            rows[[i, 2]] = (i as f64).cos();
            rows[[i, 5]] = 1.2;
        }
        HillsSeries::from(rows)
    }

    #[test]
    fn frame_ends() {
        let highlights = Highlights::new("frames").with_stride(3);
        assert_eq!(highlights.frame_ends(7), Ok(vec![0, 3, 6]));
        assert_eq!(highlights.frame_ends(6), Ok(vec![0, 3]));
        assert_eq!(highlights.frame_ends(0), Ok(vec![]));
    }

    #[test]
    fn frame_ends_zero_stride() {
        let highlights = Highlights::new("frames").with_stride(0);
        assert_eq!(highlights.frame_ends(7), Err(RenderError::InvalidStride));
    }

    #[test]
    fn draw_single_frame() {
        let slices = series(5).slices();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (500, 250)).into_drawing_area();
            draw_frame(&root, &slices, 3).unwrap();
        }

        assert!(svg.contains("3 ns"));
        assert!(svg.contains("cv2"));
    }

    #[test]
    fn render_frames() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("frames");
        let highlights = Highlights::new(&output)
            .with_prefix("frame")
            .with_stride(2)
            .with_size(400, 200);

        let written = highlights.render(&series(5)).unwrap();

        assert_eq!(
            written,
            vec![
                output.join("frame_00000.svg"),
                output.join("frame_00001.svg"),
                output.join("frame_00002.svg"),
            ]
        );

        for path in written.iter() {
            let content = std::fs::read_to_string(path).unwrap();
            assert!(content.contains("<svg"));
        }

        let last = std::fs::read_to_string(&written[2]).unwrap();
        assert!(last.contains("4 ns"));
    }

    #[test]
    fn render_empty() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("frames");

        let written = Highlights::new(&output).render(&HillsSeries::new()).unwrap();
        assert!(written.is_empty());
        assert!(!output.exists());
    }
}
