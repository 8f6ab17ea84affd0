// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Dashboard showing the progress of a metadynamics simulation, drawn into an SVG file.
//!
//! The dashboard consists of four panels:
//! - collective variables as a function of time,
//! - trajectory in the plane of the collective variables over the reference latent space,
//! - heights of the deposited hills as a function of time,
//! - reference latent space colored by RMSD from the reference structure.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters_svg::SVGBackend;

use super::palette::ColorScale;
use super::Renderer;
use crate::auxiliary::padded_range;
use crate::errors::RenderError;
use crate::files::FileType;
use crate::monitor::Cycle;
use crate::structures::liveness::Liveness;
use crate::structures::reference::ReferenceLatentSpace;

pub(crate) type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Color of the reference latent space drawn in the background.
const BACKGROUND_GRAY: RGBColor = RGBColor(170, 170, 170);

/// Renderer drawing the dashboard into an SVG file, overwriting it every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDashboard {
    path: PathBuf,
    size: (u32, u32),
}

impl SvgDashboard {
    /// Create a new dashboard renderer writing into `path`.
    /// If the file does not have the `svg` extension, the extension is replaced.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = match FileType::from_name(path.as_ref()) {
            FileType::SVG => path.as_ref().to_path_buf(),
            _ => path.as_ref().with_extension("svg"),
        };

        SvgDashboard {
            path,
            size: (2000, 1000),
        }
    }

    /// Create new `SvgDashboard` with specific size of the image (in pixels).
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Path to the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Renderer for SvgDashboard {
    fn render(&mut self, cycle: &Cycle<'_>) -> Result<(), RenderError> {
        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        draw_dashboard(&root, cycle).map_err(|e| RenderError::DrawingFailed(e.to_string()))
    }
}

/// Draw all four panels of the dashboard.
pub(crate) fn draw_dashboard<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    cycle: &Cycle<'_>,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let panels = root.split_evenly((2, 2));
    draw_collective_variables(&panels[0], cycle)?;
    draw_cv_plane(&panels[1], cycle)?;
    draw_hill_heights(&panels[2], cycle)?;
    draw_latent_space(&panels[3], cycle.reference)?;

    root.present()?;
    Ok(())
}

fn liveness_label(liveness: Liveness) -> &'static str {
    match liveness {
        Liveness::Running => "running",
        Liveness::Idle => "not running",
        Liveness::Unknown => "status unknown",
    }
}

/// Collective variables as a function of time.
fn draw_collective_variables<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cycle: &Cycle<'_>,
) -> DrawResult<DB> {
    let slices = &cycle.slices;

    let title = match cycle.progress {
        Some(progress) => format!(
            "Time: {} ns ({})",
            progress.time_ns(),
            liveness_label(cycle.liveness)
        ),
        None => format!("Time: unknown ({})", liveness_label(cycle.liveness)),
    };

    let (x_min, x_max) = padded_range(slices.time().iter().copied());
    let (y_min, y_max) = padded_range(slices.cv1().iter().chain(slices.cv2().iter()).copied());

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("time (ns)")
        .y_desc("cv")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            slices.time().iter().copied().zip(slices.cv1().iter().copied()),
            &BLUE,
        ))?
        .label("cv1")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(
            slices.time().iter().copied().zip(slices.cv2().iter().copied()),
            &GREEN,
        ))?
        .label("cv2")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &GREEN));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

/// Trajectory in the plane of collective variables drawn over the reference latent space.
fn draw_cv_plane<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cycle: &Cycle<'_>,
) -> DrawResult<DB> {
    let slices = &cycle.slices;

    let title = match cycle.progress {
        Some(progress) => format!("o: reference structure    x: {} step", progress.step()),
        None => String::from("o: reference structure    x: unknown step"),
    };

    let (x_min, x_max) = padded_range(
        slices
            .cv1()
            .iter()
            .copied()
            .chain(cycle.reference.points().map(|(x, _)| x)),
    );
    let (y_min, y_max) = padded_range(
        slices
            .cv2()
            .iter()
            .copied()
            .chain(cycle.reference.points().map(|(_, y)| y)),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc("cv1").y_desc("cv2").draw()?;

    chart.draw_series(
        cycle
            .reference
            .points()
            .map(|point| Circle::new(point, 1, BACKGROUND_GRAY.filled())),
    )?;

    let scale = ColorScale::from_values(slices.time().iter().copied());
    chart.draw_series(
        slices
            .cv_points()
            .zip(slices.time().iter())
            .map(|(point, &time)| Circle::new(point, 1, scale.color(time).filled())),
    )?;

    if let Some(first) = slices.cv_points().next() {
        chart.draw_series(std::iter::once(Circle::new(first, 5, BLACK.filled())))?;
    }

    if let Some(last) = slices.cv_points().last() {
        chart.draw_series(std::iter::once(Cross::new(last, 6, BLACK.stroke_width(2))))?;
    }

    Ok(())
}

/// Heights of the deposited hills as a function of time.
fn draw_hill_heights<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cycle: &Cycle<'_>,
) -> DrawResult<DB> {
    let slices = &cycle.slices;

    let (x_min, x_max) = padded_range(slices.time().iter().copied());
    let (y_min, y_max) = padded_range(slices.height().iter().copied());

    let mut chart = ChartBuilder::on(area)
        .caption(format!("Hills ({} deposited)", slices.len()), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("time (ns)")
        .y_desc("hill height")
        .draw()?;

    let scale = ColorScale::from_values(slices.time().iter().copied());
    chart.draw_series(
        slices
            .time()
            .iter()
            .zip(slices.height().iter())
            .map(|(&time, &height)| Circle::new((time, height), 2, scale.color(time).filled())),
    )?;

    Ok(())
}

/// Reference latent space colored by RMSD from the reference structure.
fn draw_latent_space<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    reference: &ReferenceLatentSpace,
) -> DrawResult<DB> {
    let (x_min, x_max) = padded_range(reference.points().map(|(x, _)| x));
    let (y_min, y_max) = padded_range(reference.points().map(|(_, y)| y));

    let mut chart = ChartBuilder::on(area)
        .caption("Latent space", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc("cv1").y_desc("cv2").draw()?;

    let rmsd = reference.rmsd();
    let scale = ColorScale::from_values(rmsd.iter().copied());
    chart.draw_series(
        reference
            .points()
            .zip(rmsd.iter())
            .map(|(point, &value)| Circle::new(point, 2, scale.color(value).filled())),
    )?;

    if let Some(point) = reference.reference_point() {
        chart.draw_series(std::iter::once(Circle::new(point, 5, BLACK.filled())))?;
    }

    Ok(())
}

/******************************/
/*         UNIT TESTS         */
/******************************/
