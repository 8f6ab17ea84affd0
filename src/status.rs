// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Implementation of StatusPrinter structure for printing the status of a monitored simulation.

use colored::{ColoredString, Colorize};
use std::io::Write;

use crate::errors::RenderError;
use crate::monitor::Cycle;
use crate::render::Renderer;
use crate::structures::liveness::Liveness;

/// String that can be used as a status label inside `StatusPrinter`.
#[derive(Debug, Clone, PartialEq)]
struct StatusMessage {
    msg: ColoredString,
}

impl StatusMessage {
    /// Create new `StatusMessage`.
    ///
    /// ## Panics
    /// Panics if the string is longer than 9 characters.
    fn new(string: ColoredString) -> Self {
        if string.chars().count() > 9 {
            panic!("FATAL HILLWATCH ERROR | StatusMessage::new | `StatusMessage` can not be longer than 9 characters.");
        }

        StatusMessage { msg: string }
    }

    /// Print formatted `StatusMessage`.
    fn print(&self, out: &mut dyn Write, colored: bool) -> std::io::Result<()> {
        if colored {
            write!(out, "[{: ^9}]   ", self.msg)
        } else {
            write!(out, "[{: ^9}]   ", self.msg.as_ref() as &str)
        }
    }
}

/// Structure printing a single status line for each monitoring cycle.
///
/// The status line contains the liveness of the simulation, the last simulation step
/// and time reported in the log file, and the number of hills deposited so far.
/// Errors encountered during the cycle are printed as warnings before the status line.
pub struct StatusPrinter {
    /// Stream to write the status info to.
    output: Box<dyn Write>,
    /// If true, the output will be colored. Default: true.
    colored: bool,
    /// String to be printed with the current simulation step. Default: "Step".cyan().
    step_msg: ColoredString,
    /// String to be printed with the current simulation time. Default: "Time".bright_purple().
    time_msg: ColoredString,
    /// String to be printed with the number of hills. Default: "Hills".blue().
    hills_msg: ColoredString,
    /// Label printed when the simulation is running. Default: "RUNNING".green().
    running_msg: StatusMessage,
    /// Label printed when the simulation is not running. Default: "IDLE".red().
    idle_msg: StatusMessage,
    /// Label printed when the liveness could not be determined. Default: "UNKNOWN".bright_purple().
    unknown_msg: StatusMessage,
    /// Label printed with a reported error. Default: "WARNING".yellow().
    warning_msg: StatusMessage,
    /// Label printed when the monitoring is stopped. Default: "STOPPED".normal().
    stopped_msg: StatusMessage,
    /// String terminating the status line. Default: `\n`.
    terminating: String,
}

impl StatusPrinter {
    /// Create an instance of `StatusPrinter` with default parameters.
    ///
    /// The default values of the `StatusPrinter` parameters.
    /// - `output`: `std::io::stdout()` (stream to write the status info to)
    /// - `colored`: `true` (should the output be colored?)
    /// - `step_msg`: `"Step".cyan()` (string associated with the simulation step)
    /// - `time_msg`: `"Time".bright_purple()` (string associated with the simulation time)
    /// - `hills_msg`: `"Hills".blue()` (string associated with the number of hills)
    /// - `running_msg`: `"RUNNING".green()` (label printed when the simulation is running)
    /// - `idle_msg`: `"IDLE".red()` (label printed when the simulation is not running)
    /// - `unknown_msg`: `"UNKNOWN".bright_purple()` (label printed when the liveness is unknown)
    /// - `warning_msg`: `"WARNING".yellow()` (label printed with reported errors)
    /// - `stopped_msg`: `"STOPPED".normal()` (label printed once the monitoring is stopped)
    /// - `terminating`: `\n` (string terminating the status line; set to `\r` to overwrite the line in a terminal)
    ///
    /// ## Examples
    /// ```no_run
    /// use hillwatch::prelude::*;
    /// use colored::Colorize;
    ///
    /// let file = std::fs::File::create("status.log").unwrap();
    /// let printer = StatusPrinter::new()
    ///     .with_output(Box::from(file))
    ///     // colored output does not make sense for a file
    ///     .with_colored(false)
    ///     .with_idle_msg("STALLED".red());
    /// ```
    pub fn new() -> Self {
        StatusPrinter {
            output: Box::from(std::io::stdout()),
            colored: true,
            step_msg: "Step".cyan(),
            time_msg: "Time".bright_purple(),
            hills_msg: "Hills".blue(),
            running_msg: StatusMessage::new("RUNNING".green()),
            idle_msg: StatusMessage::new("IDLE".red()),
            unknown_msg: StatusMessage::new("UNKNOWN".bright_purple()),
            warning_msg: StatusMessage::new("WARNING".yellow()),
            stopped_msg: StatusMessage::new("STOPPED".normal()),
            terminating: String::from("\n"),
        }
    }

    /// Create new `StatusPrinter` with specific `output` stream.
    pub fn with_output(mut self, stream: Box<dyn Write>) -> Self {
        self.output = stream;
        self
    }

    /// Create new `StatusPrinter` with specific value for `colored`.
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Create new `StatusPrinter` with specific value for `step_msg`.
    pub fn with_step_msg(mut self, step_msg: ColoredString) -> Self {
        self.step_msg = step_msg;
        self
    }

    /// Create new `StatusPrinter` with specific value for `time_msg`.
    pub fn with_time_msg(mut self, time_msg: ColoredString) -> Self {
        self.time_msg = time_msg;
        self
    }

    /// Create new `StatusPrinter` with specific value for `hills_msg`.
    pub fn with_hills_msg(mut self, hills_msg: ColoredString) -> Self {
        self.hills_msg = hills_msg;
        self
    }

    /// Create new `StatusPrinter` with specific value for `running_msg`.
    ///
    /// ## Panics
    /// Panics if the `running_msg` is longer than 9 characters.
    pub fn with_running_msg(mut self, running_msg: ColoredString) -> Self {
        self.running_msg = StatusMessage::new(running_msg);
        self
    }

    /// Create new `StatusPrinter` with specific value for `idle_msg`.
    ///
    /// ## Panics
    /// Panics if the `idle_msg` is longer than 9 characters.
    pub fn with_idle_msg(mut self, idle_msg: ColoredString) -> Self {
        self.idle_msg = StatusMessage::new(idle_msg);
        self
    }

    /// Create new `StatusPrinter` with specific value for `unknown_msg`.
    ///
    /// ## Panics
    /// Panics if the `unknown_msg` is longer than 9 characters.
    pub fn with_unknown_msg(mut self, unknown_msg: ColoredString) -> Self {
        self.unknown_msg = StatusMessage::new(unknown_msg);
        self
    }

    /// Create new `StatusPrinter` with specific value for `warning_msg`.
    ///
    /// ## Panics
    /// Panics if the `warning_msg` is longer than 9 characters.
    pub fn with_warning_msg(mut self, warning_msg: ColoredString) -> Self {
        self.warning_msg = StatusMessage::new(warning_msg);
        self
    }

    /// Create new `StatusPrinter` with specific value for `stopped_msg`.
    ///
    /// ## Panics
    /// Panics if the `stopped_msg` is longer than 9 characters.
    pub fn with_stopped_msg(mut self, stopped_msg: ColoredString) -> Self {
        self.stopped_msg = StatusMessage::new(stopped_msg);
        self
    }

    /// Create new `StatusPrinter` with specific value for `terminating`.
    pub fn with_terminating(mut self, string: &str) -> Self {
        self.terminating = string.to_string();
        self
    }

    /// Get the text of a string respecting the `colored` setting.
    fn text(&self, string: &ColoredString) -> String {
        if self.colored {
            string.to_string()
        } else {
            (string.as_ref() as &str).to_owned()
        }
    }

    /// Print a warning line. Warnings are always terminated by a newline.
    fn print_warning(&mut self, message: &str) -> std::io::Result<()> {
        self.warning_msg.print(&mut self.output, self.colored)?;
        writeln!(self.output, "{}", message)?;
        self.output.flush()
    }

    /// Print the status line of a single cycle.
    fn print_status(&mut self, cycle: &Cycle<'_>) -> std::io::Result<()> {
        let label = match cycle.liveness {
            Liveness::Running => &self.running_msg,
            Liveness::Idle => &self.idle_msg,
            Liveness::Unknown => &self.unknown_msg,
        };
        label.print(&mut self.output, self.colored)?;

        let (step, time) = match cycle.progress {
            Some(progress) => (
                progress.step().to_string(),
                format!("{:.3}", progress.time_ns()),
            ),
            None => (String::from("?"), String::from("?")),
        };

        let line = format!(
            "{} {:>12} | {} {:>12} ns | {} {:>8} (+{}){}",
            self.text(&self.step_msg),
            step,
            self.text(&self.time_msg),
            time,
            self.text(&self.hills_msg),
            cycle.series.len(),
            cycle.appended,
            self.terminating
        );

        write!(self.output, "{}", line)?;
        self.output.flush()
    }

    /// Print the final line once the monitoring is stopped.
    fn print_stopped(&mut self, cycles: u64) -> std::io::Result<()> {
        // keep the last status line if it is not terminated by a newline
        if self.terminating != "\n" {
            writeln!(self.output)?;
        }

        self.stopped_msg.print(&mut self.output, self.colored)?;
        writeln!(self.output, "Monitoring stopped after {} cycles.", cycles)?;
        self.output.flush()
    }
}

impl Default for StatusPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for StatusPrinter {
    fn render(&mut self, cycle: &Cycle<'_>) -> Result<(), RenderError> {
        for issue in cycle.issues.iter() {
            self.print_warning(&issue.to_string())
                .map_err(|_| RenderError::CouldNotWrite)?;
        }

        self.print_status(cycle)
            .map_err(|_| RenderError::CouldNotWrite)
    }

    fn report(&mut self, error: &dyn std::error::Error) {
        if self.print_warning(&error.to_string()).is_err() {
            eprintln!("{}", error);
        }
    }

    fn finish(&mut self, cycles: u64) -> Result<(), RenderError> {
        self.print_stopped(cycles)
            .map_err(|_| RenderError::CouldNotWrite)
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
