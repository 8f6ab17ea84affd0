// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Small functions for testing purposes.

#[cfg(test)]
pub(crate) mod utilities {
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use groan_rs::prelude::*;

    /// Append `content` to the file, creating it if it does not exist.
    pub(crate) fn append_to_file(path: &Path, content: &str) {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();

        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
    }

    /// Line of a HILLS file with 7 columns deposited at `i` ns.
    pub(crate) fn hills_line(i: f64) -> String {
        format!("{} 1.0 2.0 0.35 0.35 {} 10\n", i * 1000.0, 10.0 + i)
    }

    /// Positions (in nm) of the atoms of a small test structure.
    const ATOMS: [(f32, f32, f32); 4] = [
        (2.0, 2.0, 2.0),
        (2.5, 2.0, 2.0),
        (2.0, 2.6, 2.0),
        (2.0, 2.0, 2.7),
    ];

    /// Write a four-atom gro file with a cubic box into `directory`.
    pub(crate) fn write_structure(directory: &Path) -> PathBuf {
        let path = directory.join("structure.gro");

        let mut content = format!("Test structure\n{:>5}\n", ATOMS.len());
        for (i, (x, y, z)) in ATOMS.iter().enumerate() {
            content.push_str(&format!(
                "{:>5}{:<5}{:>5}{:>5}{:>8.3}{:>8.3}{:>8.3}\n",
                1,
                "LIG",
                format!("C{}", i + 1),
                i + 1,
                x,
                y,
                z
            ));
        }
        content.push_str("   5.00000   5.00000   5.00000\n");

        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write a three-frame xtc trajectory of the structure into `directory`.
    /// Frames are written every 1 ns. The first frame is the structure itself,
    /// the second frame is its translated copy and in the third frame one atom is moved.
    pub(crate) fn write_trajectory(directory: &Path, structure: &Path) -> PathBuf {
        let path = directory.join("trajectory.xtc");

        let mut system = System::from_file(structure).unwrap();
        system.xtc_writer_init(&path).unwrap();

        system.set_simulation_time(0.0);
        system.traj_write_frame().unwrap();

        system.set_simulation_time(1000.0);
        system
            .atoms_translate(&Vector3D::new(0.3, 0.2, -0.1))
            .unwrap();
        system.traj_write_frame().unwrap();

        system.set_simulation_time(2000.0);
        system
            .get_atom_mut(3)
            .unwrap()
            .set_position(Vector3D::new(2.6, 2.5, 2.9));
        system.traj_write_frame().unwrap();

        system.traj_close();
        path
    }
}
