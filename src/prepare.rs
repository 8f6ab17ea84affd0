// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Preparation of the simulation trajectory for visualization.
//!
//! Hydrogens are removed, molecules are made whole across periodic boundaries, and the protein is
//! centered and superposed onto the reference structure. All of this is done by `gmx trjconv`;
//! this module only constructs and executes the commands.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use getset::Getters;
use serde::{Deserialize, Serialize};

use crate::errors::{PrepareError, RmsdError};
use crate::structures::rmsd::{RmsdReference, RmsdSeries};

/// Input and output files of the trajectory preparation.
/// Relative paths are resolved against `directory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default, deny_unknown_fields)]
pub struct PreparePaths {
    /// Gromacs executable. Default: `gmx`.
    #[getset(get = "pub")]
    gmx: String,
    /// Directory in which the simulation was run. Default: `.`.
    #[getset(get = "pub")]
    directory: PathBuf,
    /// Raw trajectory produced by the simulation. Default: `md.xtc`.
    #[getset(get = "pub")]
    trajectory: PathBuf,
    /// Structure of the full simulated system. Default: `npt.gro`.
    #[getset(get = "pub")]
    structure: PathBuf,
    /// Reference structure without hydrogens. Default: `npt_nh.pdb`.
    #[getset(get = "pub")]
    reference: PathBuf,
    /// Trajectory of the protein without hydrogens. Default: `protein.xtc`.
    #[getset(get = "pub")]
    protein_trajectory: PathBuf,
    /// Trajectory with removed jumps across periodic boundaries. Default: `MD_pbc.xtc`.
    #[getset(get = "pub")]
    nojump_trajectory: PathBuf,
    /// Centered and fitted trajectory. Default: `MD_fit.xtc`.
    #[getset(get = "pub")]
    fitted_trajectory: PathBuf,
    /// Index group used for output, centering, and fitting. Default: `Protein-H`.
    #[getset(get = "pub")]
    group: String,
}

impl Default for PreparePaths {
    fn default() -> Self {
        PreparePaths {
            gmx: String::from("gmx"),
            directory: PathBuf::from("."),
            trajectory: PathBuf::from("md.xtc"),
            structure: PathBuf::from("npt.gro"),
            reference: PathBuf::from("npt_nh.pdb"),
            protein_trajectory: PathBuf::from("protein.xtc"),
            nojump_trajectory: PathBuf::from("MD_pbc.xtc"),
            fitted_trajectory: PathBuf::from("MD_fit.xtc"),
            group: String::from("Protein-H"),
        }
    }
}

impl PreparePaths {
    /// Create new `PreparePaths` with default file names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new `PreparePaths` with specific Gromacs executable.
    pub fn with_gmx(mut self, gmx: &str) -> Self {
        self.gmx = gmx.to_owned();
        self
    }

    /// Create new `PreparePaths` with specific simulation directory.
    pub fn with_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }

    /// Create new `PreparePaths` with specific raw trajectory.
    pub fn with_trajectory(mut self, trajectory: impl AsRef<Path>) -> Self {
        self.trajectory = trajectory.as_ref().to_path_buf();
        self
    }

    /// Create new `PreparePaths` with specific structure of the simulated system.
    pub fn with_structure(mut self, structure: impl AsRef<Path>) -> Self {
        self.structure = structure.as_ref().to_path_buf();
        self
    }

    /// Create new `PreparePaths` with specific reference structure.
    pub fn with_reference(mut self, reference: impl AsRef<Path>) -> Self {
        self.reference = reference.as_ref().to_path_buf();
        self
    }

    /// Create new `PreparePaths` with specific index group.
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = group.to_owned();
        self
    }

    /// Construct the `gmx trjconv` invocations preparing the trajectory.
    pub fn trjconv_pipeline(&self) -> Vec<Invocation> {
        let group = format!("{}\n", self.group);

        vec![
            Invocation::trjconv(
                &self.gmx,
                vec![
                    "-f".into(),
                    path_arg(&self.trajectory),
                    "-s".into(),
                    path_arg(&self.structure),
                    "-o".into(),
                    path_arg(&self.protein_trajectory),
                ],
                group.clone(),
            ),
            Invocation::trjconv(
                &self.gmx,
                vec![
                    "-f".into(),
                    path_arg(&self.protein_trajectory),
                    "-s".into(),
                    path_arg(&self.reference),
                    "-pbc".into(),
                    "nojump".into(),
                    "-o".into(),
                    path_arg(&self.nojump_trajectory),
                ],
                group.clone(),
            ),
            // groups for centering, fitting, and output
            Invocation::trjconv(
                &self.gmx,
                vec![
                    "-f".into(),
                    path_arg(&self.nojump_trajectory),
                    "-s".into(),
                    path_arg(&self.reference),
                    "-center".into(),
                    "-fit".into(),
                    "rot+trans".into(),
                    "-o".into(),
                    path_arg(&self.fitted_trajectory),
                ],
                group.repeat(3),
            ),
        ]
    }
}

#[inline(always)]
fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Single execution of an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute.
    pub program: String,
    /// Arguments of the program.
    pub args: Vec<String>,
    /// Text passed to the standard input of the program.
    pub input: String,
}

impl Invocation {
    fn trjconv(gmx: &str, args: Vec<String>, input: String) -> Self {
        let mut full_args = vec![String::from("trjconv")];
        full_args.extend(args);

        Invocation {
            program: gmx.to_owned(),
            args: full_args,
            input,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.args.iter() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Executes external programs.
pub trait CommandRunner {
    /// Execute the invocation inside `directory`, waiting for it to finish.
    fn run(&mut self, invocation: &Invocation, directory: &Path) -> Result<(), PrepareError>;
}

/// Runs the programs as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation, directory: &Path) -> Result<(), PrepareError> {
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(directory)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PrepareError::CouldNotSpawn(invocation.to_string(), e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(invocation.input.as_bytes())
                .map_err(|_| PrepareError::CouldNotFeedInput(invocation.to_string()))?;
        }

        let status = child
            .wait()
            .map_err(|e| PrepareError::CouldNotSpawn(invocation.to_string(), e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(PrepareError::CommandFailed(
                invocation.to_string(),
                status.to_string(),
            ))
        }
    }
}

/// Structure and trajectory ready for visualization.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PreparedTrajectory {
    /// Reference structure (topology) of the trajectory.
    #[getset(get = "pub")]
    structure: PathBuf,
    /// Centered and fitted trajectory.
    #[getset(get = "pub")]
    trajectory: PathBuf,
}

impl PreparedTrajectory {
    /// Calculate RMSD of each frame of the prepared trajectory from its first frame.
    ///
    /// ## Returns
    /// `RmsdSeries` or `RmsdError` if the structure or the trajectory could not be read.
    pub fn rmsd(&self, selection: &str) -> Result<RmsdSeries, RmsdError> {
        RmsdSeries::from_trajectory(
            &self.structure,
            &self.trajectory,
            selection,
            RmsdReference::FirstFrame,
        )
    }
}

/// Center and fit the simulation trajectory using `gmx trjconv`.
///
/// ## Returns
/// - `PreparedTrajectory` with paths to the reference structure and the fitted trajectory.
/// - `PrepareError` if any of the `gmx trjconv` invocations fails. The remaining invocations are not run.
///
/// ## Notes
/// - Output files of the individual steps are overwritten.
pub fn prepare(
    paths: &PreparePaths,
    runner: &mut impl CommandRunner,
) -> Result<PreparedTrajectory, PrepareError> {
    for invocation in paths.trjconv_pipeline() {
        runner.run(&invocation, &paths.directory)?;
    }

    Ok(PreparedTrajectory {
        structure: paths.directory.join(&paths.reference),
        trajectory: paths.directory.join(&paths.fitted_trajectory),
    })
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::utilities::{write_structure, write_trajectory};

    /// Records invocations instead of running them; fails at the `fail_at`th invocation.
    #[derive(Default)]
    struct RecordingRunner {
        invocations: Vec<(Invocation, PathBuf)>,
        fail_at: Option<usize>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&mut self, invocation: &Invocation, directory: &Path) -> Result<(), PrepareError> {
            self.invocations
                .push((invocation.clone(), directory.to_path_buf()));

            if self.fail_at == Some(self.invocations.len()) {
                Err(PrepareError::CommandFailed(
                    invocation.to_string(),
                    String::from("exit status: 1"),
                ))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn pipeline_default() {
        let pipeline = PreparePaths::default().trjconv_pipeline();
        assert_eq!(pipeline.len(), 3);

        assert_eq!(
            pipeline[0].to_string(),
            "gmx trjconv -f md.xtc -s npt.gro -o protein.xtc"
        );
        assert_eq!(pipeline[0].input, "Protein-H\n");

        assert_eq!(
            pipeline[1].to_string(),
            "gmx trjconv -f protein.xtc -s npt_nh.pdb -pbc nojump -o MD_pbc.xtc"
        );
        assert_eq!(pipeline[1].input, "Protein-H\n");

        assert_eq!(
            pipeline[2].to_string(),
            "gmx trjconv -f MD_pbc.xtc -s npt_nh.pdb -center -fit rot+trans -o MD_fit.xtc"
        );
        assert_eq!(pipeline[2].input, "Protein-H\nProtein-H\nProtein-H\n");
    }

    #[test]
    fn pipeline_custom() {
        let paths = PreparePaths::new()
            .with_gmx("gmx_mpi")
            .with_trajectory("run/traj.xtc")
            .with_structure("run/system.gro")
            .with_reference("ref.pdb")
            .with_group("Backbone");
        let pipeline = paths.trjconv_pipeline();

        assert_eq!(pipeline[0].program, "gmx_mpi");
        assert_eq!(
            pipeline[0].args,
            vec![
                "trjconv",
                "-f",
                "run/traj.xtc",
                "-s",
                "run/system.gro",
                "-o",
                "protein.xtc"
            ]
        );
        assert_eq!(pipeline[1].args[4], "ref.pdb");
        assert_eq!(pipeline[2].input, "Backbone\nBackbone\nBackbone\n");
    }

    #[test]
    fn prepare_success() {
        let paths = PreparePaths::new().with_directory("simulation");
        let mut runner = RecordingRunner::default();

        let prepared = prepare(&paths, &mut runner).unwrap();

        assert_eq!(prepared.structure(), &PathBuf::from("simulation/npt_nh.pdb"));
        assert_eq!(prepared.trajectory(), &PathBuf::from("simulation/MD_fit.xtc"));

        assert_eq!(runner.invocations.len(), 3);
        for (_, directory) in runner.invocations.iter() {
            assert_eq!(directory, &PathBuf::from("simulation"));
        }
    }

    #[test]
    fn prepare_failure_stops_pipeline() {
        let paths = PreparePaths::new();
        let mut runner = RecordingRunner {
            fail_at: Some(2),
            ..Default::default()
        };

        match prepare(&paths, &mut runner) {
            Err(PrepareError::CommandFailed(command, status)) => {
                assert!(command.contains("-pbc nojump"));
                assert_eq!(status, "exit status: 1");
            }
            other => panic!("Unexpected result `{:?}`.", other),
        }

        assert_eq!(runner.invocations.len(), 2);
    }

    #[test]
    fn process_runner_missing_program() {
        let invocation = Invocation {
            program: String::from("hillwatch-nonexistent-program"),
            args: vec![],
            input: String::new(),
        };

        match ProcessRunner.run(&invocation, Path::new(".")) {
            Err(PrepareError::CouldNotSpawn(command, _)) => {
                assert_eq!(command, "hillwatch-nonexistent-program")
            }
            other => panic!("Unexpected result `{:?}`.", other),
        }
    }

    #[test]
    fn paths_from_yaml() {
        let paths: PreparePaths =
            serde_yaml::from_str("directory: sim\ngroup: Backbone\n").unwrap();

        assert_eq!(paths.directory(), &PathBuf::from("sim"));
        assert_eq!(paths.group(), "Backbone");
        assert_eq!(paths.trajectory(), &PathBuf::from("md.xtc"));
    }

    #[test]
    fn prepared_rmsd() {
        let dir = tempfile::TempDir::new().unwrap();
        let structure = write_structure(dir.path());
        let trajectory = write_trajectory(dir.path(), &structure);

        let prepared = PreparedTrajectory {
            structure,
            trajectory,
        };

        let series = prepared.rmsd("all").unwrap();
        assert_eq!(series.len(), 3);
        assert!(series.rmsd()[0] < 1e-4);
        assert!(series.rmsd()[1] < 1e-3);
        assert!(series.rmsd()[2] > 0.01);
    }

    #[test]
    fn prepared_rmsd_missing_trajectory() {
        let dir = tempfile::TempDir::new().unwrap();
        let structure = write_structure(dir.path());

        let prepared = PreparedTrajectory {
            structure,
            trajectory: dir.path().join("MD_fit.xtc"),
        };

        assert!(matches!(
            prepared.rmsd("all"),
            Err(RmsdError::CouldNotReadTrajectory(_, _))
        ));
    }
}
