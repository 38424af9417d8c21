// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use super::layout::PackageLayout;
use crate::recipe::options::ResolvedOptions;
use crate::recipe::package_info::ConsumerMetadata;
use crate::recipe::source::SourceSnapshot;
use std::path::PathBuf;

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Parent directory for build directories (system temp dir when `None`)
    pub build_root: Option<PathBuf>,
    /// Persistent source tree, re-verified against the tag on every cook
    ///
    /// When `None` each cook clones into its own build directory.
    pub source_dir: Option<PathBuf>,
    /// Parallel jobs passed to the build tool
    pub jobs: u32,
    /// Keep the build directory after completion (for debugging)
    pub keep_builddir: bool,
    /// Build tool program
    pub cmake: PathBuf,
    /// Git program
    pub git: PathBuf,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            build_root: None,
            source_dir: None,
            jobs,
            keep_builddir: false,
            cmake: PathBuf::from("cmake"),
            git: PathBuf::from("git"),
        }
    }
}

impl KitchenConfig {
    /// Configuration that reuses a persistent source checkout
    pub fn with_source_dir(source_dir: PathBuf) -> Self {
        Self {
            source_dir: Some(source_dir),
            ..Self::default()
        }
    }
}

/// Result of cooking the recipe
#[derive(Debug)]
pub struct CookResult {
    /// Installed and normalized package
    pub layout: PackageLayout,
    pub metadata: ConsumerMetadata,
    pub options: ResolvedOptions,
    pub source: SourceSnapshot,
    /// sha256 of the generated toolchain and dependency artifacts
    pub config_fingerprint: String,
    /// Build log
    pub log: String,
    /// Build directory, when kept
    pub build_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kitchen_config_default() {
        let config = KitchenConfig::default();
        assert!(config.jobs > 0);
        assert!(!config.keep_builddir);
        assert!(config.source_dir.is_none());
        assert_eq!(config.cmake, PathBuf::from("cmake"));
        assert_eq!(config.git, PathBuf::from("git"));
    }

    #[test]
    fn test_kitchen_config_with_source_dir() {
        let config = KitchenConfig::with_source_dir(PathBuf::from("/srv/liblava"));
        assert_eq!(config.source_dir, Some(PathBuf::from("/srv/liblava")));
        assert!(config.jobs > 0);
    }
}
