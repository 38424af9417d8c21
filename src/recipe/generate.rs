// src/recipe/generate.rs

//! Build-tool configuration generation
//!
//! Translates resolved options and settings into the artifacts consumed by
//! CMake: a toolchain file of cache variables and a dependency manifest
//! naming the third-party packages the build must locate. The manifest is
//! written twice, as JSON for tooling and as a CMake script that the
//! toolchain hooks in after `project()` through `CMAKE_PROJECT_INCLUDE`.
//!
//! Every variable is emitted explicitly, including the ones that are off,
//! so a configure invocation can be reproduced from the artifact alone.
//! Output depends only on the inputs: the same options and settings always
//! render byte-identical files.

use crate::error::{Error, Result};
use crate::recipe::options::{OptionKey, ResolvedOptions};
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the generated toolchain
pub const TOOLCHAIN_FILE: &str = "lava_toolchain.cmake";

/// File name of the generated dependency manifest
pub const DEPENDENCIES_FILE: &str = "lava_dependencies.json";

/// File name of the CMake script locating the dependencies
pub const DEPENDENCIES_CMAKE_FILE: &str = "lava_dependencies.cmake";

/// The templating feature is never built
const TEMPLATE_SWITCH: (&str, bool) = ("LIBLAVA_TEMPLATE", false);

/// One CMake cache variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainVariable {
    pub name: String,
    pub value: String,
}

impl ToolchainVariable {
    fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }

    fn switch(name: &str, on: bool) -> Self {
        Self::new(name, on_off(on))
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// A third-party package the build tool must find
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    /// Name passed to `find_package`
    pub cmake_package: String,
    /// Imported target to link
    pub cmake_target: String,
}

impl Dependency {
    fn new(name: &str, cmake_package: &str, cmake_target: &str) -> Self {
        Self {
            name: name.to_string(),
            cmake_package: cmake_package.to_string(),
            cmake_target: cmake_target.to_string(),
        }
    }
}

/// Dependency-declaration artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyManifest {
    pub build_type: String,
    pub dependencies: Vec<Dependency>,
}

impl DependencyManifest {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::IoError(format!("Failed to serialize dependency manifest: {}", e)))
    }

    /// Render the manifest as a CMake script of `find_package` calls
    ///
    /// Each package is looked up in config mode; packages the build brings
    /// in itself are left to it, so a lookup miss is not an error here.
    pub fn render_cmake(&self) -> String {
        let mut out = String::from("# Generated dependencies for liblava. Do not edit.\n\n");
        for dep in &self.dependencies {
            out.push_str(&format!("find_package({} CONFIG QUIET)\n", dep.cmake_package));
        }
        let targets: Vec<_> = self
            .dependencies
            .iter()
            .map(|d| d.cmake_target.as_str())
            .collect();
        out.push_str(&format!(
            "\nset(LIBLAVA_DEPENDENCY_TARGETS \"{}\")\n",
            targets.join(";")
        ));
        out
    }
}

/// liblava's own third-party dependencies, in link order
fn third_party_dependencies() -> Vec<Dependency> {
    vec![
        Dependency::new("shaderc", "shaderc", "shaderc::shaderc_combined"),
        Dependency::new("glfw", "glfw3", "glfw"),
        Dependency::new("physfs", "PhysFS", "PhysFS::PhysFS"),
        Dependency::new("spdlog", "spdlog", "spdlog::spdlog"),
    ]
}

/// Everything the build tool is configured with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedConfig {
    /// Toolchain variables in emission order
    pub variables: Vec<ToolchainVariable>,
    pub dependencies: DependencyManifest,
}

/// Paths of the artifacts written by [`GeneratedConfig::write_to`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub toolchain: PathBuf,
    pub dependencies: PathBuf,
    pub dependencies_cmake: PathBuf,
}

/// Generate the build-tool configuration
pub fn generate(options: &ResolvedOptions, settings: &Settings) -> GeneratedConfig {
    let mut variables = vec![
        ToolchainVariable::switch(
            "CMAKE_POSITION_INDEPENDENT_CODE",
            options.enabled(OptionKey::Fpic),
        ),
        ToolchainVariable::switch("LIBLAVA_TEST", options.enabled(OptionKey::Test)),
        ToolchainVariable::switch("LIBLAVA_DEMO", options.enabled(OptionKey::Demo)),
        ToolchainVariable::switch(TEMPLATE_SWITCH.0, TEMPLATE_SWITCH.1),
        ToolchainVariable::new("CMAKE_BUILD_TYPE", settings.build_type.as_str()),
    ];

    if let Some(cppstd) = settings.cppstd() {
        variables.push(ToolchainVariable::new(
            "CMAKE_CXX_STANDARD",
            format!("{:02}", cppstd.year),
        ));
        variables.push(ToolchainVariable::switch("CMAKE_CXX_EXTENSIONS", cppstd.gnu));
    }

    GeneratedConfig {
        variables,
        dependencies: DependencyManifest {
            build_type: settings.build_type.as_str().to_string(),
            dependencies: third_party_dependencies(),
        },
    }
}

impl GeneratedConfig {
    /// Look up a variable's value
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }

    /// Render the CMake toolchain file
    pub fn render_toolchain(&self) -> String {
        let mut out = String::from("# Generated toolchain for liblava. Do not edit.\n\n");
        for var in &self.variables {
            out.push_str(&format!(
                "set({} \"{}\" CACHE STRING \"\" FORCE)\n",
                var.name, var.value
            ));
        }
        out.push_str(&format!(
            "\nset(LIBLAVA_DEPENDENCIES_FILE \"${{CMAKE_CURRENT_LIST_DIR}}/{}\")\n",
            DEPENDENCIES_FILE
        ));
        out.push_str(&format!(
            "set(CMAKE_PROJECT_INCLUDE \"${{CMAKE_CURRENT_LIST_DIR}}/{}\")\n",
            DEPENDENCIES_CMAKE_FILE
        ));
        out
    }

    /// sha256 digest over the rendered artifacts
    pub fn fingerprint(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(self.render_toolchain().as_bytes());
        hasher.update(b"\0");
        hasher.update(self.dependencies.to_json()?.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.dependencies.render_cmake().as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    /// Write the toolchain file and both dependency artifacts into `dir`
    pub fn write_to(&self, dir: &Path) -> Result<GeneratedFiles> {
        fs::create_dir_all(dir)?;

        let toolchain = dir.join(TOOLCHAIN_FILE);
        fs::write(&toolchain, self.render_toolchain())?;

        let dependencies = dir.join(DEPENDENCIES_FILE);
        fs::write(&dependencies, self.dependencies.to_json()?)?;

        let dependencies_cmake = dir.join(DEPENDENCIES_CMAKE_FILE);
        fs::write(&dependencies_cmake, self.dependencies.render_cmake())?;

        Ok(GeneratedFiles {
            toolchain,
            dependencies,
            dependencies_cmake,
        })
    }
}
