// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Rendering of the data collected by the [`Monitor`](crate::monitor::Monitor).

use crate::errors::RenderError;
use crate::monitor::Cycle;

pub mod dashboard;
pub mod highlights;
pub mod rmsd_plot;
mod palette;

/// Consumer of the data collected in each monitoring cycle.
pub trait Renderer {
    /// Render the data of a single cycle.
    fn render(&mut self, cycle: &Cycle<'_>) -> Result<(), RenderError>;

    /// Report an error that occurred while monitoring. Prints to standard error by default.
    fn report(&mut self, error: &dyn std::error::Error) {
        eprintln!("{}", error);
    }

    /// Called once the monitoring has been stopped.
    fn finish(&mut self, _cycles: u64) -> Result<(), RenderError> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, cycle: &Cycle<'_>) -> Result<(), RenderError> {
        (**self).render(cycle)
    }

    fn report(&mut self, error: &dyn std::error::Error) {
        (**self).report(error)
    }

    fn finish(&mut self, cycles: u64) -> Result<(), RenderError> {
        (**self).finish(cycles)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, cycle: &Cycle<'_>) -> Result<(), RenderError> {
        (**self).render(cycle)
    }

    fn report(&mut self, error: &dyn std::error::Error) {
        (**self).report(error)
    }

    fn finish(&mut self, cycles: u64) -> Result<(), RenderError> {
        (**self).finish(cycles)
    }
}

/// Renders with both renderers. Errors are reported by the first renderer.
impl<A: Renderer, B: Renderer> Renderer for (A, B) {
    fn render(&mut self, cycle: &Cycle<'_>) -> Result<(), RenderError> {
        let first = self.0.render(cycle);
        let second = self.1.render(cycle);
        first.and(second)
    }

    fn report(&mut self, error: &dyn std::error::Error) {
        self.0.report(error)
    }

    fn finish(&mut self, cycles: u64) -> Result<(), RenderError> {
        let first = self.0.finish(cycles);
        let second = self.1.finish(cycles);
        first.and(second)
    }
}

/// Renders with an optional renderer; does nothing if it is `None`.
impl<R: Renderer> Renderer for Option<R> {
    fn render(&mut self, cycle: &Cycle<'_>) -> Result<(), RenderError> {
        match self {
            Some(renderer) => renderer.render(cycle),
            None => Ok(()),
        }
    }

    fn report(&mut self, error: &dyn std::error::Error) {
        match self {
            Some(renderer) => renderer.report(error),
            None => eprintln!("{}", error),
        }
    }

    fn finish(&mut self, cycles: u64) -> Result<(), RenderError> {
        match self {
            Some(renderer) => renderer.finish(cycles),
            None => Ok(()),
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
