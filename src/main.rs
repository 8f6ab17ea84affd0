// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Watch a running metadynamics simulation.

use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use hillwatch::config::parse_seconds;
use hillwatch::prelude::*;

type CliResult = Result<(), Box<dyn Error + Send + Sync>>;

fn seconds_parser(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    parse_seconds(seconds).ok_or_else(|| format!("`{}` is not a positive duration", value))
}

/// Monitor of metadynamics simulations performed with Gromacs and Plumed.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Periodically read the HILLS and log files and report the progress of the simulation.
    ///
    /// Runs until interrupted by Ctrl-C.
    Watch(WatchArgs),

    /// Write frames replaying the exploration of the collective variable space.
    Highlights(HighlightsArgs),

    /// Center and fit the simulation trajectory using `gmx trjconv`.
    Prepare(PrepareArgs),
}

#[derive(clap::Args)]
struct WatchArgs {
    /// Configuration file (yaml). Options provided on the command line take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HILLS file written by Plumed.
    #[arg(long)]
    hills: Option<PathBuf>,

    /// Log file written by Gromacs.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Low-dimensional projection of the reference trajectory.
    #[arg(long)]
    lows: Option<PathBuf>,

    /// RMSD of the reference trajectory frames (xvg or plain table).
    #[arg(long)]
    lows_rmsd: Option<PathBuf>,

    /// Reference structure. Used with `--lows-trajectory` to calculate the RMSD of the reference frames.
    #[arg(long, requires = "lows_trajectory")]
    lows_structure: Option<PathBuf>,

    /// Reference trajectory (xtc) with one frame per point of the latent space.
    #[arg(long, requires = "lows_structure")]
    lows_trajectory: Option<PathBuf>,

    /// Atoms used to calculate the RMSD of the reference frames.
    #[arg(long)]
    rmsd_selection: Option<String>,

    /// Time between two polls in seconds.
    #[arg(short, long, value_parser=seconds_parser)]
    interval: Option<Duration>,

    /// Log file not modified for this many seconds means that the simulation is not running.
    #[arg(long, value_parser=seconds_parser)]
    threshold: Option<Duration>,

    /// SVG file to draw the dashboard into every cycle.
    #[arg(short, long)]
    dashboard: Option<PathBuf>,

    /// Do not color the status output.
    #[arg(long)]
    no_color: bool,
}

#[derive(clap::Args)]
struct HighlightsArgs {
    /// HILLS file written by Plumed.
    #[arg(long, default_value = "HILLS")]
    hills: PathBuf,

    /// Number of hills between two frames.
    #[arg(short, long, default_value_t = 1000)]
    stride: usize,

    /// Directory to write the frames into.
    #[arg(short, long, default_value = "highlights")]
    output_dir: PathBuf,
}

#[derive(clap::Args)]
struct PrepareArgs {
    /// Configuration file (yaml). Only the `prepare` section is used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the simulation files.
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// SVG file to plot the RMSD of the prepared trajectory into.
    #[arg(short, long, default_value = "rmsd.svg")]
    rmsd_plot: PathBuf,

    /// Atoms of the prepared trajectory used to calculate the RMSD.
    #[arg(long, default_value = "all")]
    rmsd_selection: String,
}

fn main() -> CliResult {
    let args = Args::parse();

    match args.command {
        Command::Watch(args) => watch(args),
        Command::Highlights(args) => highlights(args),
        Command::Prepare(args) => prepare_trajectory(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<MonitorConfig, Box<dyn Error + Send + Sync>> {
    match path {
        Some(path) => Ok(MonitorConfig::from_file(path)?),
        None => Ok(MonitorConfig::new()),
    }
}

fn watch(args: WatchArgs) -> CliResult {
    let mut config = load_config(args.config.as_ref())?;

    if let Some(hills) = args.hills {
        config = config.with_hills(hills);
    }
    if let Some(log) = args.log {
        config = config.with_log(log);
    }
    if let Some(lows) = args.lows {
        config = config.with_lows(lows);
    }
    if let Some(lows_rmsd) = args.lows_rmsd {
        config = config.with_lows_rmsd(lows_rmsd);
    }
    if let (Some(structure), Some(trajectory)) = (args.lows_structure, args.lows_trajectory) {
        config = config.with_lows_trajectory(structure, trajectory);
    }
    if let Some(selection) = args.rmsd_selection {
        config = config.with_rmsd_selection(&selection);
    }
    if let Some(interval) = args.interval {
        config = config.with_poll_interval(interval);
    }
    if let Some(threshold) = args.threshold {
        config = config.with_liveness_threshold(threshold);
    }
    if let Some(dashboard) = args.dashboard {
        config = config.with_dashboard(dashboard);
    }
    if args.no_color {
        config = config.with_colored(false);
    }

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })?;

    let printer = StatusPrinter::new().with_colored(config.colored());
    let dashboard = config.dashboard().as_ref().map(SvgDashboard::new);
    let mut renderer = (printer, dashboard);

    let mut monitor = Monitor::from_config(config)?;
    monitor.run(&mut renderer, &stop_flag);

    Ok(())
}

fn highlights(args: HighlightsArgs) -> CliResult {
    let series = read_hills(&args.hills)?;

    let frames = Highlights::new(&args.output_dir)
        .with_stride(args.stride)
        .render(&series)?;

    println!(
        "Written {} frames into `{}`.",
        frames.len(),
        args.output_dir.display()
    );

    Ok(())
}

fn prepare_trajectory(args: PrepareArgs) -> CliResult {
    let config = load_config(args.config.as_ref())?;

    let mut paths = config.prepare().clone();
    if let Some(directory) = args.directory {
        paths = paths.with_directory(directory);
    }

    for invocation in paths.trjconv_pipeline() {
        println!("{}", invocation);
    }

    let prepared = prepare(&paths, &mut ProcessRunner)?;
    println!(
        "Structure: {}\nTrajectory: {}",
        prepared.structure().display(),
        prepared.trajectory().display()
    );

    let series = prepared.rmsd(&args.rmsd_selection)?;
    let plot = RmsdPlot::new(&args.rmsd_plot);
    plot.render(&series)?;
    println!(
        "RMSD of {} frames plotted into `{}`.",
        series.len(),
        plot.path().display()
    );

    Ok(())
}
