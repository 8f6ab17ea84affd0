// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Detection of whether the simulation producing the output files is still running.

use std::path::Path;
use std::time::{Duration, SystemTime};

/// Liveness of the simulation derived from the modification time of its log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Log file has been modified recently.
    Running,
    /// Log file has not been modified for at least the liveness threshold.
    Idle,
    /// Modification time of the log file could not be obtained (e.g. the file does not exist yet).
    Unknown,
}

impl Liveness {
    /// Classify the simulation as running if the file was modified less than `threshold` before `now`.
    ///
    /// ## Notes
    /// - Modification exactly `threshold` ago is classified as `Liveness::Idle`.
    /// - Modification time lying in the future (clock skew on network file systems)
    ///   is classified as `Liveness::Running`.
    pub fn from_times(modified: SystemTime, now: SystemTime, threshold: Duration) -> Liveness {
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);

        if age < threshold {
            Liveness::Running
        } else {
            Liveness::Idle
        }
    }

    /// Obtain liveness from the modification time of the file at `path`.
    /// Returns `Liveness::Unknown` if the metadata of the file can not be read.
    pub fn of_file(path: impl AsRef<Path>, now: SystemTime, threshold: Duration) -> Liveness {
        match std::fs::metadata(path.as_ref()).and_then(|meta| meta.modified()) {
            Ok(modified) => Liveness::from_times(modified, now, threshold),
            Err(_) => Liveness::Unknown,
        }
    }

    /// Returns `true` only if the simulation is known to be running.
    #[inline(always)]
    pub fn is_live(&self) -> bool {
        *self == Liveness::Running
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auxiliary::DEFAULT_LIVENESS_THRESHOLD;
    use tempfile::NamedTempFile;

    fn base() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    #[test]
    fn recent_is_running() {
        let modified = base();
        let now = modified + Duration::from_secs(10);
        let liveness = Liveness::from_times(modified, now, DEFAULT_LIVENESS_THRESHOLD);
        assert_eq!(liveness, Liveness::Running);
        assert!(liveness.is_live());
    }

    #[test]
    fn just_below_threshold() {
        let modified = base();
        let now = modified + Duration::from_millis(299_999);
        assert_eq!(
            Liveness::from_times(modified, now, DEFAULT_LIVENESS_THRESHOLD),
            Liveness::Running
        );
    }

    #[test]
    fn exactly_threshold_is_idle() {
        let modified = base();
        let now = modified + Duration::from_secs(300);
        let liveness = Liveness::from_times(modified, now, DEFAULT_LIVENESS_THRESHOLD);
        assert_eq!(liveness, Liveness::Idle);
        assert!(!liveness.is_live());
    }

    #[test]
    fn old_is_idle() {
        let modified = base();
        let now = modified + Duration::from_secs(3600);
        assert_eq!(
            Liveness::from_times(modified, now, DEFAULT_LIVENESS_THRESHOLD),
            Liveness::Idle
        );
    }

    #[test]
    fn future_modification_is_running() {
        let now = base();
        let modified = now + Duration::from_secs(5);
        assert_eq!(
            Liveness::from_times(modified, now, DEFAULT_LIVENESS_THRESHOLD),
            Liveness::Running
        );
    }

    #[test]
    fn of_file() {
        let file = NamedTempFile::new().unwrap();
        let modified = std::fs::metadata(file.path())
            .unwrap()
            .modified()
            .unwrap();

        assert_eq!(
            Liveness::of_file(file.path(), modified, DEFAULT_LIVENESS_THRESHOLD),
            Liveness::Running
        );
        assert_eq!(
            Liveness::of_file(
                file.path(),
                modified + DEFAULT_LIVENESS_THRESHOLD,
                DEFAULT_LIVENESS_THRESHOLD
            ),
            Liveness::Idle
        );
    }

    #[test]
    fn of_missing_file() {
        let liveness = Liveness::of_file(
            "test_files/nonexistent.log",
            SystemTime::now(),
            DEFAULT_LIVENESS_THRESHOLD,
        );
        assert_eq!(liveness, Liveness::Unknown);
        assert!(!liveness.is_live());
    }
}
