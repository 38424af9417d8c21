// src/recipe/kitchen/cook.rs

//! Cook: the phase pipeline for a single recipe invocation
//!
//! Each phase consumes the context produced by the phase before it and
//! returns a new one, so a phase cannot run before its predecessor has
//! succeeded. Nothing is mutated across phases except the build log.

use crate::error::{Error, Result};
use crate::recipe::generate::{self, GeneratedConfig, GeneratedFiles};
use crate::recipe::identity::RecipeIdentity;
use crate::recipe::options::{resolve_schema, OptionOverrides, OptionSchema, ResolvedOptions};
use crate::recipe::package_info::{self, ConsumerMetadata};
use crate::recipe::source::{self, SourceSnapshot};
use crate::recipe::validate::{check_min_cppstd, MIN_CPPSTD};
use crate::settings::Settings;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::build_tool::{BuildInvocation, BuildStep};
use super::layout::{self, PackageLayout};
use super::Kitchen;

/// Pipeline phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Configure,
    Validate,
    Source,
    Generate,
    Build,
    Package,
    PackageInfo,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Validate => "validate",
            Self::Source => "source",
            Self::Generate => "generate",
            Self::Build => "build",
            Self::Package => "package",
            Self::PackageInfo => "package_info",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first failure of an invocation, tagged with its phase
#[derive(Debug, thiserror::Error)]
#[error("{phase} phase failed: {source}")]
pub struct PhaseFailure {
    pub phase: Phase,
    #[source]
    pub source: Error,
}

pub(super) fn at(phase: Phase) -> impl FnOnce(Error) -> PhaseFailure {
    move |source| PhaseFailure { phase, source }
}

/// Options resolved against the platform
#[derive(Debug, Clone)]
pub struct Configured<'a> {
    pub identity: &'a RecipeIdentity,
    pub settings: &'a Settings,
    pub schema: OptionSchema,
    pub options: ResolvedOptions,
}

/// Preconditions checked; nothing has touched the filesystem yet
#[derive(Debug, Clone)]
pub struct Validated<'a>(Configured<'a>);

impl<'a> Validated<'a> {
    pub fn configured(&self) -> &Configured<'a> {
        &self.0
    }
}

/// Source tree checked out at the recipe version
#[derive(Debug)]
pub struct Sourced<'a> {
    pub validated: Validated<'a>,
    pub source: SourceSnapshot,
}

/// Build-tool configuration written to disk
#[derive(Debug)]
pub struct Generated<'a> {
    pub sourced: Sourced<'a>,
    pub config: GeneratedConfig,
    pub files: GeneratedFiles,
}

/// Configure and build steps completed
#[derive(Debug)]
pub struct Built<'a> {
    pub generated: Generated<'a>,
    pub invocation: BuildInvocation,
}

/// Installed and normalized package
#[derive(Debug)]
pub struct Packaged<'a> {
    pub built: Built<'a>,
    pub layout: PackageLayout,
}

/// Phase 0: resolve the option schema and apply overrides
pub fn configure<'a>(
    identity: &'a RecipeIdentity,
    settings: &'a Settings,
    overrides: &OptionOverrides,
) -> Result<Configured<'a>> {
    let schema = resolve_schema(settings.os);
    let options = schema.resolve(overrides)?;
    for (key, value) in options.iter() {
        debug!("Option {}={}", key, value);
    }
    Ok(Configured {
        identity,
        settings,
        schema,
        options,
    })
}

/// Phase 1: check toolchain preconditions
pub fn validate(configured: Configured<'_>) -> Result<Validated<'_>> {
    check_min_cppstd(configured.settings, MIN_CPPSTD)?;
    Ok(Validated(configured))
}

/// Phase 6: compute consumer metadata
pub fn package_info(packaged: &Packaged<'_>) -> ConsumerMetadata {
    let settings = packaged.built.generated.sourced.validated.0.settings;
    package_info::package_info(&packaged.layout, settings)
}

/// Filesystem-touching phases of a single cook
pub struct Cook<'k> {
    pub(super) kitchen: &'k Kitchen,
    /// Temporary build directory
    pub(super) build_dir: TempDir,
    /// Build log accumulator
    pub(super) log: String,
}

impl<'k> Cook<'k> {
    pub(super) fn new(kitchen: &'k Kitchen) -> Result<Self> {
        let builder = {
            let mut b = tempfile::Builder::new();
            b.prefix("lava-build-");
            b
        };
        let build_dir = match &kitchen.config.build_root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| Error::IoError(format!("Failed to create build directory: {}", e)))?;

        Ok(Self {
            kitchen,
            build_dir,
            log: String::new(),
        })
    }

    pub(super) fn build_path(&self) -> &Path {
        self.build_dir.path()
    }

    /// Phase 2: check out the source tree
    pub(super) fn source<'a>(&mut self, validated: Validated<'a>) -> Result<Sourced<'a>> {
        let dest = match &self.kitchen.config.source_dir {
            Some(dir) => dir.clone(),
            None => self.build_path().join("source"),
        };
        let identity = validated.0.identity;
        let snapshot = source::acquire(self.kitchen.transport.as_ref(), identity, &dest)?;
        self.log_line(&format!(
            "Source: {} at {} in {}",
            identity.url,
            snapshot.tag,
            snapshot.root.display()
        ));
        Ok(Sourced {
            validated,
            source: snapshot,
        })
    }

    /// Phase 3: write the toolchain and dependency artifacts
    pub(super) fn generate<'a>(&mut self, sourced: Sourced<'a>) -> Result<Generated<'a>> {
        let configured = &sourced.validated.0;
        let config = generate::generate(&configured.options, configured.settings);
        let files = config.write_to(&self.build_path().join("generators"))?;
        self.log_line(&format!("Generated {}", files.toolchain.display()));
        self.log_line(&format!("Generated {}", files.dependencies.display()));
        self.log_line(&format!("Generated {}", files.dependencies_cmake.display()));
        Ok(Generated {
            sourced,
            config,
            files,
        })
    }

    /// Phase 4: configure and build
    pub(super) fn build<'a>(
        &mut self,
        generated: Generated<'a>,
        output_dir: &Path,
    ) -> Result<Built<'a>> {
        let configured = &generated.sourced.validated.0;
        let invocation = BuildInvocation {
            source_dir: generated.sourced.source.root.clone(),
            build_dir: self.build_path().join("build"),
            package_dir: output_dir.join(configured.identity.package_dir_name()),
            toolchain_file: generated.files.toolchain.clone(),
            build_type: configured.settings.build_type,
            jobs: self.kitchen.config.jobs,
        };
        fs::create_dir_all(&invocation.build_dir)?;

        self.run_step(BuildStep::Configure, &invocation)?;
        self.run_step(BuildStep::Build, &invocation)?;

        Ok(Built {
            generated,
            invocation,
        })
    }

    /// Phase 5: install into a clean package folder and normalize it
    pub(super) fn package<'a>(&mut self, built: Built<'a>) -> Result<Packaged<'a>> {
        let package_dir = built.invocation.package_dir.clone();
        if package_dir.exists() {
            debug!("Clearing previous package at {}", package_dir.display());
            fs::remove_dir_all(&package_dir)?;
        }
        fs::create_dir_all(&package_dir)?;

        let layout = PackageLayout::new(&package_dir);
        if let Err(e) = self.install(&built, &layout) {
            discard_package(&package_dir);
            return Err(e);
        }

        let files = layout.files()?;
        self.log_line(&format!(
            "Packaged {} ({} files)",
            package_dir.display(),
            files.len()
        ));
        info!("Packaged: {} ({} files)", package_dir.display(), files.len());

        Ok(Packaged { built, layout })
    }

    fn install(&mut self, built: &Built<'_>, layout: &PackageLayout) -> Result<()> {
        self.run_step(BuildStep::Install, &built.invocation)?;
        layout::normalize(layout, &built.generated.sourced.source.root)
    }

    /// Run a build step; a non-success status is fatal
    fn run_step(&mut self, step: BuildStep, invocation: &BuildInvocation) -> Result<()> {
        info!("Running {} step", step);
        let output = self.kitchen.build_tool.run(step, invocation)?;

        self.log_build_output(step.as_str(), &output.stdout, &output.stderr);

        if !output.success() {
            return Err(Error::Build {
                step: step.as_str(),
                status: output.status,
                stderr: output.stderr,
            });
        }

        Ok(())
    }

    /// Keep or drop the build directory, returning its path when kept
    pub(super) fn finish(self) -> (String, Option<PathBuf>) {
        if self.kitchen.config.keep_builddir {
            #[allow(deprecated)]
            let path = self.build_dir.into_path();
            info!("Keeping build directory {}", path.display());
            (self.log, Some(path))
        } else {
            (self.log, None)
        }
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }

    /// Log step output (stdout/stderr) with a step header
    fn log_build_output(&mut self, step: &str, stdout: &str, stderr: &str) {
        self.log_line(&format!("=== {} ===", step));
        if !stdout.is_empty() {
            self.log.push_str(stdout);
            self.log.push('\n');
        }
        if !stderr.is_empty() {
            self.log.push_str(stderr);
            self.log.push('\n');
        }
    }
}

/// Remove a partially installed package so no half-built tree survives
fn discard_package(package_dir: &Path) {
    if !package_dir.exists() {
        return;
    }
    match fs::remove_dir_all(package_dir) {
        Ok(()) => debug!("Removed partial package at {}", package_dir.display()),
        Err(e) => warn!(
            "Failed to remove partial package at {}: {}",
            package_dir.display(),
            e
        ),
    }
}
