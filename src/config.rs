// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Configuration of the monitoring of a running metadynamics simulation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::auxiliary::{DEFAULT_LIVENESS_THRESHOLD, DEFAULT_POLL_INTERVAL};
use crate::errors::ConfigError;
use crate::prepare::PreparePaths;

/// Configuration of the monitor. Can be constructed programmatically
/// using `with_%PARAMETER()` methods or read from a YAML file.
///
/// ## Example
/// ```yaml
/// hills: simulation/HILLS
/// log: simulation/md.log
/// lows: reference/lows.txt
/// lows_rmsd: reference/rmsd.xvg
/// poll_interval: 30
/// dashboard: dashboard.svg
/// ```
/// Durations are given in seconds. Fields that are not provided keep their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// HILLS file written by PLUMED. Default: `HILLS`.
    #[getset(get = "pub")]
    hills: PathBuf,
    /// Log file written by Gromacs. Default: `md.log`.
    #[getset(get = "pub")]
    log: PathBuf,
    /// Low-dimensional projection of the reference trajectory. Default: none.
    #[getset(get = "pub")]
    lows: Option<PathBuf>,
    /// RMSD of the reference trajectory frames. Default: none.
    #[getset(get = "pub")]
    lows_rmsd: Option<PathBuf>,
    /// Reference structure used to calculate the RMSD of the reference trajectory frames. Default: none.
    #[getset(get = "pub")]
    lows_structure: Option<PathBuf>,
    /// Reference trajectory (xtc) with one frame per point of the latent space. Default: none.
    #[getset(get = "pub")]
    lows_trajectory: Option<PathBuf>,
    /// Atoms used to calculate the RMSD of the reference trajectory frames. Default: `all`.
    #[getset(get = "pub")]
    rmsd_selection: String,
    /// Time between two polls. Default: 60 s.
    #[serde(with = "seconds")]
    #[getset(get_copy = "pub")]
    poll_interval: Duration,
    /// Log file not modified for this long means that the simulation is not running. Default: 300 s.
    #[serde(with = "seconds")]
    #[getset(get_copy = "pub")]
    liveness_threshold: Duration,
    /// SVG file to draw the dashboard into every cycle. Default: none.
    #[getset(get = "pub")]
    dashboard: Option<PathBuf>,
    /// Should the status output be colored? Default: true.
    #[getset(get_copy = "pub")]
    colored: bool,
    /// Files used for the preparation of the trajectory.
    #[getset(get = "pub")]
    prepare: PreparePaths,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            hills: PathBuf::from("HILLS"),
            log: PathBuf::from("md.log"),
            lows: None,
            lows_rmsd: None,
            lows_structure: None,
            lows_trajectory: None,
            rmsd_selection: String::from("all"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            liveness_threshold: DEFAULT_LIVENESS_THRESHOLD,
            dashboard: None,
            colored: true,
            prepare: PreparePaths::default(),
        }
    }
}

impl MonitorConfig {
    /// Create configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from a YAML file.
    ///
    /// ## Returns
    /// `MonitorConfig` or `ConfigError` if the file does not exist or is not a valid configuration.
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(filename.as_ref()) {
            Ok(x) => x,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound(Box::from(filename.as_ref())))
            }
            Err(_) => return Err(ConfigError::CouldNotRead(Box::from(filename.as_ref()))),
        };

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseErr(Box::from(filename.as_ref()), e.to_string()))
    }

    /// Create new `MonitorConfig` with specific HILLS file.
    pub fn with_hills(mut self, hills: impl AsRef<Path>) -> Self {
        self.hills = hills.as_ref().to_path_buf();
        self
    }

    /// Create new `MonitorConfig` with specific log file.
    pub fn with_log(mut self, log: impl AsRef<Path>) -> Self {
        self.log = log.as_ref().to_path_buf();
        self
    }

    /// Create new `MonitorConfig` with specific latent space file.
    pub fn with_lows(mut self, lows: impl AsRef<Path>) -> Self {
        self.lows = Some(lows.as_ref().to_path_buf());
        self
    }

    /// Create new `MonitorConfig` with specific file with RMSD of the latent space points.
    pub fn with_lows_rmsd(mut self, lows_rmsd: impl AsRef<Path>) -> Self {
        self.lows_rmsd = Some(lows_rmsd.as_ref().to_path_buf());
        self
    }

    /// Create new `MonitorConfig` with specific reference structure and trajectory
    /// used to calculate the RMSD of the latent space points.
    pub fn with_lows_trajectory(
        mut self,
        structure: impl AsRef<Path>,
        trajectory: impl AsRef<Path>,
    ) -> Self {
        self.lows_structure = Some(structure.as_ref().to_path_buf());
        self.lows_trajectory = Some(trajectory.as_ref().to_path_buf());
        self
    }

    /// Create new `MonitorConfig` with specific selection of atoms for the RMSD calculation.
    pub fn with_rmsd_selection(mut self, selection: &str) -> Self {
        self.rmsd_selection = selection.to_owned();
        self
    }

    /// Create new `MonitorConfig` with specific value for `poll_interval`.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Create new `MonitorConfig` with specific value for `liveness_threshold`.
    pub fn with_liveness_threshold(mut self, liveness_threshold: Duration) -> Self {
        self.liveness_threshold = liveness_threshold;
        self
    }

    /// Create new `MonitorConfig` with specific dashboard output file.
    pub fn with_dashboard(mut self, dashboard: impl AsRef<Path>) -> Self {
        self.dashboard = Some(dashboard.as_ref().to_path_buf());
        self
    }

    /// Create new `MonitorConfig` with specific value for `colored`.
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Create new `MonitorConfig` with specific paths for the trajectory preparation.
    pub fn with_prepare(mut self, prepare: PreparePaths) -> Self {
        self.prepare = prepare;
        self
    }
}

/// Parse a positive, finite number of seconds.
pub fn parse_seconds(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value)
        .ok()
        .filter(|d| !d.is_zero())
}

/// (De)serialization of durations as a number of seconds.
mod seconds {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        let value = f64::deserialize(deserializer)?;
        super::parse_seconds(value).ok_or_else(|| {
            D::Error::custom(format!(
                "duration must be a positive number of seconds, not `{}`",
                value
            ))
        })
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
