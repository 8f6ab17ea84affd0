// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Implementation of the monitor watching the output files of a running metadynamics simulation.
//!
//! Every cycle, the monitor
//! 1. checks whether the simulation is still running (modification time of the log file),
//! 2. reads hills appended to the HILLS file since the previous cycle,
//! 3. reads the last simulation step and time reported in the log file,
//! 4. passes all the collected data to a [`Renderer`],
//!
//! and then sleeps until the next cycle. Monitoring continues until it is interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime};

use crate::config::MonitorConfig;
use crate::errors::{PollError, ReferenceError};
use crate::io::hills_io::{HillsPoll, HillsTail, ReadCursor};
use crate::io::log_io::{read_last_progress, LoggedProgress};
use crate::render::Renderer;
use crate::structures::hills::{HillsSeries, HillsSlices};
use crate::structures::liveness::Liveness;
use crate::structures::reference::ReferenceLatentSpace;

/// Longest uninterrupted sleep between checks of the interrupt flag.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Data collected during a single monitoring cycle.
#[derive(Debug)]
pub struct Cycle<'a> {
    /// Number of the cycle (starting from 1).
    pub number: u64,
    /// All hills read so far.
    pub series: &'a HillsSeries,
    /// Columns of the series used for visualization (time in ns).
    pub slices: HillsSlices,
    /// Number of hills read in this cycle.
    pub appended: usize,
    /// Last progress reported in the log file, if known.
    pub progress: Option<LoggedProgress>,
    /// Liveness of the simulation.
    pub liveness: Liveness,
    /// Transient errors encountered in this cycle.
    pub issues: Vec<PollError>,
    /// Reference latent space.
    pub reference: &'a ReferenceLatentSpace,
}

/// Monitor of a running metadynamics simulation.
///
/// ## Example
/// ```no_run
/// use hillwatch::prelude::*;
/// use std::sync::atomic::AtomicBool;
///
/// let config = MonitorConfig::new()
///     .with_hills("HILLS")
///     .with_log("md.log");
/// let mut monitor = Monitor::new(config, ReferenceLatentSpace::empty());
///
/// // runs until the flag is set, e.g. from a Ctrl-C handler
/// let interrupt = AtomicBool::new(false);
/// let mut printer = StatusPrinter::new();
/// monitor.run(&mut printer, &interrupt);
/// ```
#[derive(Debug)]
pub struct Monitor {
    config: MonitorConfig,
    hills: HillsTail,
    reference: ReferenceLatentSpace,
    progress: Option<LoggedProgress>,
    liveness: Liveness,
    cycles: u64,
}

impl Monitor {
    /// Create a new monitor. No file is read until the first poll.
    pub fn new(config: MonitorConfig, reference: ReferenceLatentSpace) -> Self {
        Monitor {
            hills: HillsTail::new(config.hills()),
            config,
            reference,
            progress: None,
            liveness: Liveness::Unknown,
            cycles: 0,
        }
    }

    /// Create a new monitor loading the reference latent space from the files
    /// specified in the configuration.
    ///
    /// ## Returns
    /// `ReferenceError` if the reference files could not be loaded.
    ///
    /// ## Notes
    /// - If no latent space file is specified, the reference latent space is empty.
    /// - RMSD of the latent space points is read from the RMSD file if it is specified.
    ///   Otherwise, it is calculated from the reference structure and trajectory if both are specified.
    ///   Otherwise, RMSD of all latent space points is zero.
    pub fn from_config(config: MonitorConfig) -> Result<Self, ReferenceError> {
        let reference = match (
            config.lows(),
            config.lows_rmsd(),
            config.lows_structure(),
            config.lows_trajectory(),
        ) {
            (Some(lows), Some(rmsd), _, _) => ReferenceLatentSpace::from_files(lows, rmsd)?,
            (Some(lows), None, Some(structure), Some(trajectory)) => {
                ReferenceLatentSpace::from_trajectory(
                    lows,
                    structure,
                    trajectory,
                    config.rmsd_selection(),
                )?
            }
            (Some(lows), None, _, _) => ReferenceLatentSpace::from_lows(lows)?,
            (None, _, _, _) => ReferenceLatentSpace::empty(),
        };

        Ok(Monitor::new(config, reference))
    }

    /// Perform a single monitoring cycle. `now` is the current wall-clock time.
    ///
    /// ## Notes
    /// - Errors are never propagated: they are collected in `Cycle::issues`
    ///   and the failed step is repeated in the next cycle.
    /// - The series of hills only ever grows.
    pub fn poll(&mut self, now: SystemTime) -> Cycle<'_> {
        let mut issues = Vec::new();

        self.liveness = Liveness::of_file(self.config.log(), now, self.config.liveness_threshold());

        let appended = match self.hills.poll() {
            Ok(HillsPoll::Appended(n)) => n,
            Ok(HillsPoll::Missing) | Ok(HillsPoll::Unchanged) => 0,
            Err(e) => {
                issues.push(PollError::Hills(e));
                0
            }
        };

        self.progress = match read_last_progress(self.config.log()) {
            Ok(progress) => progress,
            Err(e) => {
                issues.push(PollError::Log(e));
                None
            }
        };

        self.cycles += 1;

        Cycle {
            number: self.cycles,
            series: self.hills.series(),
            slices: self.hills.series().slices(),
            appended,
            progress: self.progress,
            liveness: self.liveness,
            issues,
            reference: &self.reference,
        }
    }

    /// Monitor the simulation until `interrupt` is set.
    /// Returns the number of performed cycles.
    ///
    /// ## Notes
    /// - The interrupt is checked between the cycles and while sleeping, never in the middle of a cycle.
    /// - Rendering errors are reported using `Renderer::report` and do not stop the monitoring.
    pub fn run<R: Renderer + ?Sized>(&mut self, renderer: &mut R, interrupt: &AtomicBool) -> u64 {
        while !interrupt.load(Ordering::SeqCst) {
            let cycle = self.poll(SystemTime::now());
            if let Err(e) = renderer.render(&cycle) {
                renderer.report(&e);
            }

            if !sleep_unless_interrupted(self.config.poll_interval(), interrupt) {
                break;
            }
        }

        if let Err(e) = renderer.finish(self.cycles) {
            renderer.report(&e);
        }

        self.cycles
    }

    /// Configuration of the monitor.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// All hills read so far.
    pub fn series(&self) -> &HillsSeries {
        self.hills.series()
    }

    /// Consumed part of the HILLS file.
    pub fn cursor(&self) -> ReadCursor {
        self.hills.cursor()
    }

    /// Progress read during the last cycle.
    pub fn progress(&self) -> Option<LoggedProgress> {
        self.progress
    }

    /// Liveness determined during the last cycle.
    pub fn liveness(&self) -> Liveness {
        self.liveness
    }

    /// Reference latent space.
    pub fn reference(&self) -> &ReferenceLatentSpace {
        &self.reference
    }

    /// Number of cycles performed so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

/// Sleep for `duration`. Returns `false` if the sleep was cut short by `interrupt`.
fn sleep_unless_interrupted(duration: Duration, interrupt: &AtomicBool) -> bool {
    let deadline = Instant::now() + duration;

    loop {
        if interrupt.load(Ordering::SeqCst) {
            return false;
        }

        let now = Instant::now();
        if now >= deadline {
            return true;
        }

        std::thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
