use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::{BLANK_DIR, IONOMYCIN_DIR, RESULTS_DIR, SAMPLE_DIR, STACK_EXTENSIONS};
use crate::error::{CalciumError, Result};

/// Directories making up one sample on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplePaths {
    pub main: PathBuf,
    pub ionomycin: PathBuf,
    pub sample: PathBuf,
    pub blank: PathBuf,
}

impl SamplePaths {
    pub fn new(main: impl Into<PathBuf>) -> Self {
        let main = main.into();
        Self {
            ionomycin: main.join(IONOMYCIN_DIR),
            sample: main.join(SAMPLE_DIR),
            blank: main.join(BLANK_DIR),
            main,
        }
    }

    /// Check which of the four directories exist.
    pub fn check(&self) -> PathReport {
        PathReport {
            main: self.main.is_dir(),
            ionomycin: self.ionomycin.is_dir(),
            sample: self.sample.is_dir(),
            blank: self.blank.is_dir(),
        }
    }
}

/// Existence flags for a sample's main and channel directories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathReport {
    pub main: bool,
    pub ionomycin: bool,
    pub sample: bool,
    pub blank: bool,
}

impl PathReport {
    const LABELS: [&'static str; 4] = ["Main", "Ionomycin", "Sample", "Blank"];

    /// Flags in `[main, ionomycin, sample, blank]` order.
    pub fn as_array(&self) -> [bool; 4] {
        [self.main, self.ionomycin, self.sample, self.blank]
    }

    pub fn is_valid(&self) -> bool {
        self.as_array().iter().all(|&ok| ok)
    }

    /// Names of the directories that are missing.
    pub fn missing(&self) -> Vec<&'static str> {
        Self::LABELS
            .iter()
            .zip(self.as_array())
            .filter(|(_, ok)| !ok)
            .map(|(label, _)| *label)
            .collect()
    }

    pub fn missing_label(&self) -> String {
        self.missing().join(", ")
    }
}

/// Sorted file names of the image stacks directly inside `dir`.
pub fn list_stack_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_stack = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| STACK_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !is_stack {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Sorted sample directories under the input root, skipping the results
/// directory. An unreadable root is the only fatal batch error.
pub fn list_sample_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|source| CalciumError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() || entry.file_name() == RESULTS_DIR {
            continue;
        }
        dirs.push(entry.path());
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_label_lists_failed_folders_in_order() {
        let report = PathReport {
            main: true,
            ionomycin: false,
            sample: true,
            blank: false,
        };
        assert!(!report.is_valid());
        assert_eq!(report.missing_label(), "Ionomycin, Blank");
    }

    #[test]
    fn channel_paths_hang_off_main() {
        let paths = SamplePaths::new("/data/s1");
        assert_eq!(paths.ionomycin, PathBuf::from("/data/s1/Ionomycin"));
        assert_eq!(paths.sample, PathBuf::from("/data/s1/Sample"));
        assert_eq!(paths.blank, PathBuf::from("/data/s1/Blank"));
    }
}
