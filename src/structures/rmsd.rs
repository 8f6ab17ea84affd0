// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Implementation of the calculation of RMSD for frames of an xtc trajectory.

use std::path::Path;

use getset::Getters;
use groan_rs::prelude::*;
use ndarray::Array1;

use crate::auxiliary::PS_PER_NS;
use crate::errors::RmsdError;
use crate::files::FileType;

/// Name of the group of atoms for which the RMSD is calculated.
const RMSD_GROUP: &str = "HillwatchRmsd";

/// Structure that the trajectory frames are compared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RmsdReference {
    /// Structure loaded from the structure file.
    Structure,
    /// First frame of the trajectory.
    FirstFrame,
}

/// RMSD of trajectory frames as a function of time.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct RmsdSeries {
    /// Simulation time of each frame (in ns).
    #[getset(get = "pub")]
    time: Array1<f64>,
    /// RMSD of each frame (in nm).
    #[getset(get = "pub")]
    rmsd: Array1<f64>,
}

impl RmsdSeries {
    /// Create a new series from times (in ns) and RMSD values (in nm).
    ///
    /// ## Panics
    /// Panics if `time` and `rmsd` have different lengths.
    pub fn new(time: Array1<f64>, rmsd: Array1<f64>) -> Self {
        assert_eq!(
            time.len(),
            rmsd.len(),
            "FATAL HILLWATCH ERROR | RmsdSeries::new | Number of times and RMSD values must match."
        );

        RmsdSeries { time, rmsd }
    }

    /// Calculate RMSD of each frame of an xtc trajectory.
    ///
    /// ## Parameters
    /// - `structure`: structure file readable by `groan_rs` (gro, pdb, tpr) with a rectangular box
    /// - `trajectory`: xtc trajectory of the same system
    /// - `selection`: atoms used for the fitting and for the RMSD (groan selection language, e.g. `all` or `@protein`)
    /// - `reference`: structure the frames are compared to
    ///
    /// ## Returns
    /// `RmsdSeries` with one value per frame or `RmsdError` if the calculation failed.
    ///
    /// ## Notes
    /// - Each frame is fitted to the reference before the RMSD is calculated.
    /// - All atoms are weighted equally.
    pub fn from_trajectory(
        structure: impl AsRef<Path>,
        trajectory: impl AsRef<Path>,
        selection: &str,
        reference: RmsdReference,
    ) -> Result<Self, RmsdError> {
        let structure = structure.as_ref();
        let trajectory = trajectory.as_ref();

        if FileType::from_name(trajectory) != FileType::XTC {
            return Err(RmsdError::UnsupportedTrajectory(Box::from(trajectory)));
        }

        let mut system = System::from_file(structure)
            .map_err(|e| RmsdError::CouldNotLoad(Box::from(structure), e.to_string()))?;

        system
            .group_create(RMSD_GROUP, selection)
            .map_err(|e| RmsdError::InvalidSelection(selection.to_owned(), e.to_string()))?;

        if system.group_get_n_atoms(RMSD_GROUP).unwrap_or(0) == 0 {
            return Err(RmsdError::InvalidSelection(
                selection.to_owned(),
                String::from("no atoms selected"),
            ));
        }

        system.atoms_iter_mut().for_each(|atom| atom.set_mass(1.0));

        let mut reference_system = match reference {
            RmsdReference::Structure => Some(system.clone()),
            RmsdReference::FirstFrame => None,
        };

        let mut time = Vec::new();
        let mut rmsd = Vec::new();

        let iterator = system.xtc_iter(trajectory).map_err(|e| {
            RmsdError::CouldNotReadTrajectory(Box::from(trajectory), e.to_string())
        })?;

        for raw_frame in iterator {
            let frame = raw_frame.map_err(|e| {
                RmsdError::CouldNotReadTrajectory(Box::from(trajectory), e.to_string())
            })?;

            let reference = reference_system.get_or_insert_with(|| frame.clone());

            let value = frame
                .calc_rmsd(reference, RMSD_GROUP)
                .map_err(|e| RmsdError::CalculationFailed(e.to_string()))?;

            time.push(frame.get_simulation_time() as f64 / PS_PER_NS);
            rmsd.push(value as f64);
        }

        if time.is_empty() {
            return Err(RmsdError::EmptyTrajectory(Box::from(trajectory)));
        }

        Ok(RmsdSeries::new(Array1::from(time), Array1::from(rmsd)))
    }

    /// Number of frames in the series.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rmsd.len()
    }

    /// Returns `true` if the series contains no frames.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rmsd.is_empty()
    }

    /// Iterate over the (time, RMSD) pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.rmsd.iter().copied())
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::utilities::{write_structure, write_trajectory};
    use float_cmp::assert_approx_eq;
    use tempfile::TempDir;

    #[test]
    fn new_and_points() {
        let series = RmsdSeries::new(
            Array1::from(vec![0.0, 1.0]),
            Array1::from(vec![0.0, 0.2]),
        );

        assert_eq!(series.len(), 2);
        assert!(!series.is_empty());
        assert_eq!(series.points().collect::<Vec<_>>(), vec![(0.0, 0.0), (1.0, 0.2)]);
    }

    #[test]
    #[should_panic(
        expected = "FATAL HILLWATCH ERROR | RmsdSeries::new | Number of times and RMSD values must match."
    )]
    fn new_mismatch() {
        let _ = RmsdSeries::new(Array1::from(vec![0.0, 1.0]), Array1::from(vec![0.0]));
    }

    #[test]
    fn from_trajectory_structure() {
        let dir = TempDir::new().unwrap();
        let structure = write_structure(dir.path());
        let trajectory = write_trajectory(dir.path(), &structure);

        let series =
            RmsdSeries::from_trajectory(&structure, &trajectory, "all", RmsdReference::Structure)
                .unwrap();

        assert_eq!(series.len(), 3);
        assert_approx_eq!(f64, series.time()[0], 0.0);
        assert_approx_eq!(f64, series.time()[1], 1.0);
        assert_approx_eq!(f64, series.time()[2], 2.0);

        // rigidly translated copies of the structure
        assert!(series.rmsd()[0] < 1e-3);
        assert!(series.rmsd()[1] < 1e-3);

        // one atom moved
        assert!(series.rmsd()[2] > 0.01);
    }

    #[test]
    fn from_trajectory_first_frame() {
        let dir = TempDir::new().unwrap();
        let structure = write_structure(dir.path());
        let trajectory = write_trajectory(dir.path(), &structure);

        let series =
            RmsdSeries::from_trajectory(&structure, &trajectory, "all", RmsdReference::FirstFrame)
                .unwrap();

        assert_eq!(series.len(), 3);
        assert_approx_eq!(f64, series.rmsd()[0], 0.0, epsilon = 1e-4);
        assert!(series.rmsd()[1] < 1e-3);
        assert!(series.rmsd()[2] > 0.01);
    }

    #[test]
    fn from_trajectory_unsupported() {
        let dir = TempDir::new().unwrap();
        let structure = write_structure(dir.path());
        let trajectory = dir.path().join("md.trr");

        assert_eq!(
            RmsdSeries::from_trajectory(&structure, &trajectory, "all", RmsdReference::Structure),
            Err(RmsdError::UnsupportedTrajectory(Box::from(trajectory.as_path())))
        );
    }

    #[test]
    fn from_trajectory_missing_structure() {
        let dir = TempDir::new().unwrap();
        let structure = dir.path().join("nonexistent.gro");
        let trajectory = dir.path().join("md.xtc");

        match RmsdSeries::from_trajectory(&structure, &trajectory, "all", RmsdReference::Structure)
        {
            Err(RmsdError::CouldNotLoad(path, _)) => assert_eq!(path.as_ref(), structure.as_path()),
            other => panic!("Unexpected result `{:?}`.", other),
        }
    }

    #[test]
    fn from_trajectory_missing_trajectory() {
        let dir = TempDir::new().unwrap();
        let structure = write_structure(dir.path());
        let trajectory = dir.path().join("nonexistent.xtc");

        match RmsdSeries::from_trajectory(&structure, &trajectory, "all", RmsdReference::Structure)
        {
            Err(RmsdError::CouldNotReadTrajectory(path, _)) => {
                assert_eq!(path.as_ref(), trajectory.as_path())
            }
            other => panic!("Unexpected result `{:?}`.", other),
        }
    }

    #[test]
    fn from_trajectory_invalid_selection() {
        let dir = TempDir::new().unwrap();
        let structure = write_structure(dir.path());
        let trajectory = write_trajectory(dir.path(), &structure);

        match RmsdSeries::from_trajectory(
            &structure,
            &trajectory,
            "resname NONEXISTENT",
            RmsdReference::Structure,
        ) {
            Err(RmsdError::InvalidSelection(selection, _)) => {
                assert_eq!(selection, "resname NONEXISTENT")
            }
            other => panic!("Unexpected result `{:?}`.", other),
        }
    }
}
