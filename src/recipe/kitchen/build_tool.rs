// src/recipe/kitchen/build_tool.rs

//! External build tool driver

use crate::error::{Error, Result};
use crate::settings::BuildType;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Steps the build tool is driven through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStep {
    Configure,
    Build,
    Install,
}

impl BuildStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Install => "install",
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paths and parameters shared by every step of one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub package_dir: PathBuf,
    pub toolchain_file: PathBuf,
    pub build_type: BuildType,
    pub jobs: u32,
}

/// What a step reported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StepOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs one build step
///
/// Implementations report the step's completion status; deciding whether
/// that status is fatal is left to the caller.
pub trait BuildTool: Send + Sync {
    fn run(&self, step: BuildStep, invocation: &BuildInvocation) -> Result<StepOutput>;
}

/// `BuildTool` backed by the `cmake` command line
#[derive(Debug, Clone)]
pub struct CmakeTool {
    program: PathBuf,
}

impl CmakeTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments for a step
    pub fn args(step: BuildStep, inv: &BuildInvocation) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        match step {
            BuildStep::Configure => {
                args.push("-S".into());
                args.push(inv.source_dir.clone().into());
                args.push("-B".into());
                args.push(inv.build_dir.clone().into());
                let mut toolchain = OsString::from("-DCMAKE_TOOLCHAIN_FILE=");
                toolchain.push(&inv.toolchain_file);
                args.push(toolchain);
                let mut prefix = OsString::from("-DCMAKE_INSTALL_PREFIX=");
                prefix.push(&inv.package_dir);
                args.push(prefix);
            }
            BuildStep::Build => {
                args.push("--build".into());
                args.push(inv.build_dir.clone().into());
                args.push("--config".into());
                args.push(inv.build_type.as_str().into());
                args.push("--parallel".into());
                args.push(inv.jobs.to_string().into());
            }
            BuildStep::Install => {
                args.push("--install".into());
                args.push(inv.build_dir.clone().into());
                args.push("--config".into());
                args.push(inv.build_type.as_str().into());
                args.push("--prefix".into());
                args.push(inv.package_dir.clone().into());
            }
        }
        args
    }
}

impl Default for CmakeTool {
    fn default() -> Self {
        Self::new("cmake")
    }
}

impl BuildTool for CmakeTool {
    fn run(&self, step: BuildStep, invocation: &BuildInvocation) -> Result<StepOutput> {
        let args = Self::args(step, invocation);
        debug!("Command: {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| Error::Build {
                step: step.as_str(),
                status: None,
                stderr: format!("Failed to run {}: {}", self.program.display(), e),
            })?;

        Ok(StepOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
