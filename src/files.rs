// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Enum capturing file types recognized by `hillwatch`.

use std::path::Path;

/// Types of files recognized by `hillwatch`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FileType {
    Unknown,
    XVG,
    SVG,
    XTC,
}

impl FileType {
    /// Identify file type from the name of the file (based on file extension).
    pub fn from_name(filename: impl AsRef<Path>) -> FileType {
        let extension = match filename.as_ref().extension() {
            Some(x) => x,
            None => return FileType::Unknown,
        };

        match extension.to_str() {
            Some("xvg") => FileType::XVG,
            Some("svg") => FileType::SVG,
            Some("xtc") => FileType::XTC,
            Some(_) | None => FileType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identify_xvg() {
        assert_eq!(FileType::from_name("rmsd.xvg"), FileType::XVG);
    }

    #[test]
    fn identify_svg() {
        assert_eq!(FileType::from_name("dashboard.svg"), FileType::SVG);
    }

    #[test]
    fn identify_xtc() {
        assert_eq!(FileType::from_name("md_fit.xtc"), FileType::XTC);
    }

    #[test]
    fn identify_unknown() {
        assert_eq!(FileType::from_name("lows.txt"), FileType::Unknown);
        assert_eq!(FileType::from_name("md.log"), FileType::Unknown);
        assert_eq!(FileType::from_name("md.trr"), FileType::Unknown);
    }

    #[test]
    fn identify_noextension() {
        assert_eq!(FileType::from_name("HILLS"), FileType::Unknown);
    }
}
