// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! # hillwatch: Monitor of Metadynamics Simulations
//!
//! Rust library and command line tool for watching the progress of a running
//! metadynamics simulation performed with Gromacs and Plumed.
//!
//! ## Usage
//!
//! Run
//!
//! ```bash
//! $ cargo add hillwatch
//! ```
//!
//! Import the crate in your Rust code:
//! ```
//! use hillwatch::prelude::*;
//! ```
//!
//! ## Examples
//!
//! #### Watching a simulation
//!
//! Read the hills deposited into a HILLS file and the progress reported in a Gromacs log file
//! every minute, print the status of the simulation and draw a dashboard.
//! Monitoring stops once Ctrl-C is pressed.
//!
//! ```no_run
//! use hillwatch::prelude::*;
//! use std::error::Error;
//! use std::sync::atomic::AtomicBool;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let config = MonitorConfig::new()
//!         .with_hills("HILLS")
//!         .with_log("md.log")
//!         .with_lows("lows.txt");
//!
//!     // reads the reference latent space
//!     let mut monitor = Monitor::from_config(config)?;
//!
//!     // print status to standard output and draw the dashboard
//!     let mut renderer = (StatusPrinter::new(), SvgDashboard::new("dashboard.svg"));
//!
//!     let interrupt = AtomicBool::new(false);
//!     monitor.run(&mut renderer, &interrupt);
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Single monitoring cycle
//!
//! The monitor can also be polled manually.
//!
//! ```no_run
//! use hillwatch::prelude::*;
//! use std::time::SystemTime;
//!
//! let config = MonitorConfig::new()
//!     .with_hills("HILLS")
//!     .with_log("md.log");
//! let mut monitor = Monitor::new(config, ReferenceLatentSpace::empty());
//!
//! let cycle = monitor.poll(SystemTime::now());
//! println!("{} hills read, simulation is {:?}", cycle.series.len(), cycle.liveness);
//! for issue in cycle.issues.iter() {
//!     eprintln!("{}", issue);
//! }
//! ```
//!
//! #### Writing highlight frames
//!
//! Replay the exploration of the collective variable space, one frame per 1000 hills.
//!
//! ```no_run
//! use hillwatch::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let series = read_hills("HILLS")?;
//!
//!     let frames = Highlights::new("highlights").render(&series)?;
//!     println!("Written {} frames.", frames.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! All parameters of the monitor can be loaded from a YAML file:
//!
//! ```yaml
//! hills: HILLS
//! log: md.log
//! lows: lows.txt
//! lows_rmsd: lows_rmsd.xvg
//! # alternatively, calculate the RMSD from the reference trajectory
//! # lows_structure: reference.gro
//! # lows_trajectory: reference.xtc
//! # rmsd_selection: "@protein"
//! poll_interval: 60
//! liveness_threshold: 300
//! dashboard: dashboard.svg
//! ```

/// Current version of the `hillwatch` library.
pub const HILLWATCH_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod auxiliary;
pub mod config;
pub mod errors;
pub mod files;
pub mod io {
    pub mod hills_io;
    pub mod log_io;
    pub mod table_io;
}
pub mod monitor;
pub mod prepare;
pub mod render;
pub mod status;
pub mod structures {
    pub mod hills;
    pub mod liveness;
    pub mod reference;
    pub mod rmsd;
}
mod test_utilities;

/// Reexported basic `hillwatch` structures and traits.
pub mod prelude {
    pub use crate::config::MonitorConfig;
    pub use crate::io::hills_io::{read_hills, HillsPoll, HillsTail, ReadCursor};
    pub use crate::io::log_io::{read_last_progress, LoggedProgress};
    pub use crate::monitor::{Cycle, Monitor};
    pub use crate::prepare::{prepare, PreparePaths, ProcessRunner};
    pub use crate::render::dashboard::SvgDashboard;
    pub use crate::render::highlights::Highlights;
    pub use crate::render::rmsd_plot::RmsdPlot;
    pub use crate::render::Renderer;
    pub use crate::status::StatusPrinter;
    pub use crate::structures::hills::{HillsSeries, HillsSlices};
    pub use crate::structures::liveness::Liveness;
    pub use crate::structures::reference::ReferenceLatentSpace;
    pub use crate::structures::rmsd::{RmsdReference, RmsdSeries};
}
