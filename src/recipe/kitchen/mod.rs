// src/recipe/kitchen/mod.rs

//! Kitchen: drives the recipe through its phases
//!
//! The Kitchen owns the collaborators the recipe calls into (a source
//! transport and a build tool) and runs the phase pipeline:
//! - Configure: resolve options against the platform
//! - Validate: check toolchain preconditions (no I/O yet)
//! - Source: check out the tagged source tree
//! - Generate: write the toolchain and dependency artifacts
//! - Build: configure and build with the external tool
//! - Package: install, prune build-tool metadata, copy the license
//! - Package info: compute consumer metadata

mod build_tool;
mod config;
mod cook;
mod layout;

pub use build_tool::{BuildInvocation, BuildStep, BuildTool, CmakeTool, StepOutput};
pub use config::{CookResult, KitchenConfig};
pub use cook::{
    configure, package_info, validate, Built, Configured, Cook, Generated, Packaged, Phase,
    PhaseFailure, Sourced, Validated,
};
pub use layout::{normalize, PackageLayout, LICENSE_PATTERN};

use crate::error::Result;
use crate::recipe::identity::RecipeIdentity;
use crate::recipe::options::OptionOverrides;
use crate::recipe::source::{self, GitTransport, SourceSnapshot, SourceTransport};
use crate::settings::Settings;
use cook::at;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The Kitchen: where the recipe is cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    identity: RecipeIdentity,
    transport: Arc<dyn SourceTransport>,
    build_tool: Arc<dyn BuildTool>,
}

impl Kitchen {
    /// Create a Kitchen using the configured `git` and `cmake` programs
    pub fn new(config: KitchenConfig) -> Self {
        let transport = Arc::new(GitTransport::new(&config.git));
        let build_tool = Arc::new(CmakeTool::new(&config.cmake));
        Self::with_collaborators(config, transport, build_tool)
    }

    /// Create a Kitchen with explicit collaborators
    pub fn with_collaborators(
        config: KitchenConfig,
        transport: Arc<dyn SourceTransport>,
        build_tool: Arc<dyn BuildTool>,
    ) -> Self {
        Self {
            config,
            identity: RecipeIdentity::liblava(),
            transport,
            build_tool,
        }
    }

    /// Create a Kitchen with default configuration
    pub fn with_defaults() -> Self {
        Self::new(KitchenConfig::default())
    }

    pub fn identity(&self) -> &RecipeIdentity {
        &self.identity
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Cook the recipe and install the package under `output_dir`
    ///
    /// Phases run strictly in order and the first failure ends the
    /// invocation; no metadata is produced for a failed cook.
    pub fn cook(
        &self,
        settings: &Settings,
        overrides: &OptionOverrides,
        output_dir: &Path,
    ) -> std::result::Result<CookResult, PhaseFailure> {
        info!(
            "Cooking {} version {}",
            self.identity.name, self.identity.version
        );

        let configured =
            configure(&self.identity, settings, overrides).map_err(at(Phase::Configure))?;
        let validated = validate(configured).map_err(at(Phase::Validate))?;

        let mut cook = Cook::new(self).map_err(at(Phase::Source))?;

        info!("Fetching source...");
        let sourced = cook.source(validated).map_err(at(Phase::Source))?;

        info!("Generating toolchain...");
        let generated = cook.generate(sourced).map_err(at(Phase::Generate))?;

        info!("Building...");
        let built = cook.build(generated, output_dir).map_err(at(Phase::Build))?;

        info!("Packaging...");
        let packaged = cook.package(built).map_err(at(Phase::Package))?;

        let metadata = package_info(&packaged);
        let config_fingerprint = packaged
            .built
            .generated
            .config
            .fingerprint()
            .map_err(at(Phase::PackageInfo))?;

        let Packaged { built, layout } = packaged;
        let (log, build_dir) = cook.finish();

        info!("Cooked {}", layout.root().display());

        Ok(CookResult {
            layout,
            metadata,
            options: built.generated.sourced.validated.configured().options.clone(),
            source: built.generated.sourced.source,
            config_fingerprint,
            log,
            build_dir,
        })
    }

    /// Check out the source tree at `dest` without building
    ///
    /// Useful for pre-fetching sources; the tree is verified against the
    /// recipe version like during a cook.
    pub fn fetch(&self, dest: &Path) -> Result<SourceSnapshot> {
        info!(
            "Fetching sources for {} version {}",
            self.identity.name, self.identity.version
        );
        source::acquire(self.transport.as_ref(), &self.identity, dest)
    }
}
