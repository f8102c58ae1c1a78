//! Executable lookup over an explicit search path

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// An ordered list of directories to look for executables in
///
/// Captured once (usually from `PATH`) and passed around explicitly so lookups
/// never read the process environment behind the caller's back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Search path made of the given directories, in priority order
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// Parse a platform-formatted search path value (`PATH` syntax)
    pub fn parse(value: impl AsRef<OsStr>) -> Self {
        Self::new(std::env::split_paths(value.as_ref()).filter(|p| !p.as_os_str().is_empty()))
    }

    /// Snapshot of the current process `PATH`; empty when unset
    pub fn from_env() -> Self {
        std::env::var_os("PATH")
            .map(Self::parse)
            .unwrap_or_default()
    }

    /// Directories in lookup order
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Find the first executable called `name`
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        self.dirs
            .iter()
            .flat_map(|dir| candidates(dir, name))
            .find(|candidate| is_executable(candidate))
    }
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name), dir.join(format!("{}.exe", name))]
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
