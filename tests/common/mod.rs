// tests/common/mod.rs

//! Shared test utilities: scripted stand-ins for git and cmake.

#![allow(dead_code)]

use lava_recipe::recipe::generate::DEPENDENCIES_CMAKE_FILE;
use lava_recipe::recipe::kitchen::{BuildInvocation, BuildStep, BuildTool, StepOutput};
use lava_recipe::recipe::SourceTransport;
use lava_recipe::{Arch, Compiler, CompilerVersion, CppStd, Os, Result, Settings};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// Marker file recording the tag a fake checkout sits on
const TAG_FILE: &str = ".fake-tag";

/// Source transport that writes a minimal liblava tree
pub struct FakeGit {
    /// Tag the clone ends up on
    pub checkout_tag: String,
    pub write_license: bool,
    pub clones: Mutex<Vec<String>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self {
            checkout_tag: "0.8.0".to_string(),
            write_license: true,
            clones: Mutex::new(Vec::new()),
        }
    }

    pub fn without_license() -> Self {
        Self {
            write_license: false,
            ..Self::new()
        }
    }

    pub fn clone_count(&self) -> usize {
        self.clones.lock().unwrap().len()
    }
}

impl SourceTransport for FakeGit {
    fn clone_tag(&self, url: &str, tag: &str, dest: &Path) -> Result<()> {
        self.clones.lock().unwrap().push(format!("{}@{}", url, tag));
        fs::create_dir_all(dest.join("src"))?;
        fs::write(dest.join("CMakeLists.txt"), "project(liblava)\n")?;
        if self.write_license {
            fs::write(dest.join("LICENSE"), "MIT License\n")?;
        }
        fs::write(dest.join(TAG_FILE), &self.checkout_tag)?;
        Ok(())
    }

    fn checked_out_tag(&self, dir: &Path) -> Result<Option<String>> {
        Ok(fs::read_to_string(dir.join(TAG_FILE)).ok())
    }
}

/// Build tool that records steps and fakes an install tree
pub struct FakeCmake {
    /// Step that exits with status 1
    pub fail_at: Option<BuildStep>,
    pub steps: Mutex<Vec<BuildStep>>,
    pub toolchains: Mutex<Vec<String>>,
    /// Dependency scripts found next to each toolchain
    pub dependency_scripts: Mutex<Vec<String>>,
}

impl FakeCmake {
    pub fn new() -> Self {
        Self {
            fail_at: None,
            steps: Mutex::new(Vec::new()),
            toolchains: Mutex::new(Vec::new()),
            dependency_scripts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(step: BuildStep) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::new()
        }
    }

    pub fn steps(&self) -> Vec<BuildStep> {
        self.steps.lock().unwrap().clone()
    }
}

impl BuildTool for FakeCmake {
    fn run(&self, step: BuildStep, inv: &BuildInvocation) -> Result<StepOutput> {
        self.steps.lock().unwrap().push(step);

        if self.fail_at == Some(step) {
            return Ok(StepOutput {
                status: Some(1),
                stdout: String::new(),
                stderr: format!("{} exploded", step),
            });
        }

        match step {
            BuildStep::Configure => {
                let toolchain = fs::read_to_string(&inv.toolchain_file)?;
                self.toolchains.lock().unwrap().push(toolchain);
                let script =
                    fs::read_to_string(inv.toolchain_file.with_file_name(DEPENDENCIES_CMAKE_FILE))?;
                self.dependency_scripts.lock().unwrap().push(script);
            }
            BuildStep::Build => {
                fs::write(inv.build_dir.join("liblava.core.a"), "")?;
            }
            BuildStep::Install => {
                let pkg = &inv.package_dir;
                fs::create_dir_all(pkg.join("include/liblava/ext"))?;
                fs::create_dir_all(pkg.join("lib/cmake/lava"))?;
                fs::create_dir_all(pkg.join("bin"))?;
                fs::write(pkg.join("include/liblava/lava.hpp"), "")?;
                fs::write(pkg.join("lib/liblava.core.a"), "")?;
                fs::write(pkg.join("lib/cmake/lava/lava-config.cmake"), "")?;
            }
        }

        Ok(StepOutput {
            status: Some(0),
            stdout: format!("{} ok", step),
            stderr: String::new(),
        })
    }
}

/// Linux/gcc 13 settings with C++20
pub fn linux_gcc() -> Settings {
    Settings::new(Os::Linux, Arch::X86_64, Compiler::Gcc, CompilerVersion::new(13, 0))
        .with_cppstd(CppStd::new(20))
}

/// Windows/msvc 193 settings with C++20
pub fn windows_msvc() -> Settings {
    Settings::new(Os::Windows, Arch::X86_64, Compiler::Msvc, CompilerVersion::new(193, 0))
        .with_cppstd(CppStd::new(20))
}
