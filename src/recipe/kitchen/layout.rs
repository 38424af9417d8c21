// src/recipe/kitchen/layout.rs

//! Installed package layout and its normalization

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Name of the license file copied into the package
pub const LICENSE_PATTERN: &str = "LICENSE";

/// Directories of an installed package, rooted at the package folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    root: PathBuf,
}

impl PackageLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    pub fn ext_include_dir(&self) -> PathBuf {
        self.root.join("include/liblava/ext")
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn licenses_dir(&self) -> PathBuf {
        self.root.join("licenses")
    }

    /// CMake package config files; never part of the package
    pub fn build_tool_dir(&self) -> PathBuf {
        self.root.join("lib/cmake")
    }

    /// Regular files under the package root, relative and sorted
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry =
                entry.map_err(|e| Error::IoError(format!("Failed to walk package: {}", e)))?;
            if entry.file_type().is_file()
                && let Ok(rel) = entry.path().strip_prefix(&self.root)
            {
                files.push(rel.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Prune build-tool metadata and copy the license into `licenses/`
///
/// Running this more than once leaves the same layout.
pub fn normalize(layout: &PackageLayout, source_root: &Path) -> Result<()> {
    let cmake_dir = layout.build_tool_dir();
    if cmake_dir.exists() {
        debug!("Removing {}", cmake_dir.display());
        fs::remove_dir_all(&cmake_dir).map_err(|e| {
            Error::Packaging(format!("Failed to remove {}: {}", cmake_dir.display(), e))
        })?;
    }

    let licenses = find_licenses(source_root)?;
    if licenses.is_empty() {
        return Err(Error::Packaging(format!(
            "No {} found in {}",
            LICENSE_PATTERN,
            source_root.display()
        )));
    }

    let dest_dir = layout.licenses_dir();
    fs::create_dir_all(&dest_dir)?;
    for license in &licenses {
        let name = license
            .file_name()
            .ok_or_else(|| {
                Error::Packaging(format!("Invalid license path: {}", license.display()))
            })?;
        fs::copy(license, dest_dir.join(name)).map_err(|e| {
            Error::Packaging(format!("Failed to copy {}: {}", license.display(), e))
        })?;
        info!("Copied license {}", license.display());
    }

    Ok(())
}

fn find_licenses(source_root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&source_root.to_string_lossy()),
        LICENSE_PATTERN
    );
    let paths = glob::glob(&pattern)
        .map_err(|e| Error::Packaging(format!("Invalid license pattern: {}", e)))?;

    let mut found = Vec::new();
    for path in paths {
        let path = path.map_err(|e| Error::Packaging(format!("Failed to read license: {}", e)))?;
        if path.is_file() {
            found.push(path);
        }
    }
    Ok(found)
}
