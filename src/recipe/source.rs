// src/recipe/source.rs

//! Source acquisition from the upstream git repository
//!
//! The source tree is always checked out at the tag equal to the recipe
//! version. A tree found at the destination is reused only after its tag
//! has been re-verified; anything else is removed and cloned again.
//! Failures are fatal and never retried here.

use crate::error::{Error, Result};
use crate::recipe::identity::RecipeIdentity;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Transport used to obtain a tagged source tree
///
/// Keeps the recipe decoupled from how the tree is actually fetched.
pub trait SourceTransport: Send + Sync {
    /// Clone `url` at `tag` into `dest`, which does not exist yet
    fn clone_tag(&self, url: &str, tag: &str, dest: &Path) -> Result<()>;

    /// Tag the tree at `dir` is checked out at, if it sits exactly on one
    fn checked_out_tag(&self, dir: &Path) -> Result<Option<String>>;
}

/// A source tree pinned to an exact tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub root: PathBuf,
    pub tag: String,
}

/// `SourceTransport` backed by the `git` command line
#[derive(Debug, Clone)]
pub struct GitTransport {
    program: PathBuf,
}

impl GitTransport {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitTransport {
    fn default() -> Self {
        Self::new("git")
    }
}

impl SourceTransport for GitTransport {
    fn clone_tag(&self, url: &str, tag: &str, dest: &Path) -> Result<()> {
        let fetch_error = |reason: String| Error::SourceFetch {
            url: url.to_string(),
            tag: tag.to_string(),
            reason,
        };

        debug!("git clone --depth 1 --branch {} {} {}", tag, url, dest.display());
        let output = Command::new(&self.program)
            .args(["clone", "--depth", "1", "--branch", tag, url])
            .arg(dest)
            .output()
            .map_err(|e| fetch_error(format!("failed to run git: {}", e)))?;

        if !output.status.success() {
            return Err(fetch_error(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(())
    }

    fn checked_out_tag(&self, dir: &Path) -> Result<Option<String>> {
        let output = Command::new(&self.program)
            .arg("-C")
            .arg(dir)
            .args(["describe", "--tags", "--exact-match"])
            .output()
            .map_err(|e| Error::IoError(format!("Failed to run git describe: {}", e)))?;

        if !output.status.success() {
            return Ok(None);
        }

        let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!tag.is_empty()).then_some(tag))
    }
}

/// Obtain the source tree for `identity` at `dest`
pub fn acquire(
    transport: &dyn SourceTransport,
    identity: &RecipeIdentity,
    dest: &Path,
) -> Result<SourceSnapshot> {
    let tag = identity.version.as_str();

    if has_entries(dest)? {
        match transport.checked_out_tag(dest) {
            Ok(Some(found)) if found == tag => {
                info!("Reusing source tree at {} (tag {})", dest.display(), tag);
                return checked_snapshot(identity, dest, found);
            }
            Ok(found) => {
                warn!(
                    "Source tree at {} is at {:?}, expected {}; re-cloning",
                    dest.display(),
                    found,
                    tag
                );
            }
            Err(e) => {
                warn!("Could not verify source tree at {}: {}; re-cloning", dest.display(), e);
            }
        }
        fs::remove_dir_all(dest)?;
    } else if dest.is_dir() {
        fs::remove_dir(dest)?;
    } else if dest.exists() {
        return Err(Error::SourceFetch {
            url: identity.url.clone(),
            tag: tag.to_string(),
            reason: format!("{} exists and is not a directory", dest.display()),
        });
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    info!("Cloning {} at tag {}", identity.url, tag);
    transport.clone_tag(&identity.url, tag, dest)?;

    match transport.checked_out_tag(dest)? {
        Some(found) if found == tag => checked_snapshot(identity, dest, found),
        found => Err(Error::SourceFetch {
            url: identity.url.clone(),
            tag: tag.to_string(),
            reason: format!("checkout is at {:?} after clone", found),
        }),
    }
}

/// Exported source patterns that match nothing under `root`
pub fn missing_exports(identity: &RecipeIdentity, root: &Path) -> Result<Vec<String>> {
    let base = glob::Pattern::escape(&root.to_string_lossy());
    let mut missing = Vec::new();
    for export in &identity.exports_sources {
        let pattern = format!("{}/{}", base, export);
        let mut matches = glob::glob(&pattern)
            .map_err(|e| Error::ParseError(format!("Invalid export pattern {}: {}", export, e)))?;
        if matches.next().is_none() {
            missing.push(export.clone());
        }
    }
    Ok(missing)
}

fn checked_snapshot(
    identity: &RecipeIdentity,
    root: &Path,
    tag: String,
) -> Result<SourceSnapshot> {
    for export in missing_exports(identity, root)? {
        warn!("Source tree at {} has nothing matching {}", root.display(), export);
    }
    Ok(SourceSnapshot {
        root: root.to_path_buf(),
        tag,
    })
}

fn has_entries(dir: &Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    Ok(fs::read_dir(dir)?.next().is_some())
}
