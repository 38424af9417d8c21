// src/recipe/identity.rs

//! Package identity for the liblava recipe

/// Immutable identity of the package being produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIdentity {
    /// Package name
    pub name: String,
    /// Package version; also the git tag the source is checked out at
    pub version: String,
    /// SPDX license identifier
    pub license: String,
    pub author: String,
    /// Upstream repository URL (also the clone URL)
    pub url: String,
    pub description: String,
    pub topics: Vec<String>,
    /// Files exported alongside the recipe when building from local sources
    pub exports_sources: Vec<String>,
}

impl RecipeIdentity {
    /// The identity shipped by this crate
    pub fn liblava() -> Self {
        Self {
            name: "liblava".to_string(),
            version: "0.8.0".to_string(),
            license: "MIT".to_string(),
            author: "Lava Block OÜ (code@liblava.dev)".to_string(),
            url: "https://github.com/liblava/liblava.git".to_string(),
            description: "A modern and easy-to-use library for the Vulkan API".to_string(),
            topics: ["vulkan", "graphics", "rendering"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exports_sources: ["CMakeLists.txt", "src/*", "include/*", "LICENSE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Directory name for the package, e.g. `liblava-0.8.0`
    pub fn package_dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}
