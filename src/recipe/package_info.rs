// src/recipe/package_info.rs

//! Consumer-facing linkage metadata
//!
//! [`ConsumerMetadata`] is the contract downstream builds link against.
//! Any visible change here (a new library, a renamed define, a different
//! order) breaks consumers.
//!
//! The library list is ordered for single-pass linkers: higher-level lava
//! modules come before the modules they depend on, followed by the bundled
//! third-party libraries.

use crate::error::{Error, Result};
use crate::recipe::kitchen::PackageLayout;
use crate::settings::{Compiler, Libcxx, Settings};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Include directories, relative to the package root
pub const INCLUDE_DIRS: [&str; 2] = ["include", "include/liblava/ext"];
pub const LIB_DIRS: [&str; 1] = ["lib"];
pub const BIN_DIRS: [&str; 1] = ["bin"];

/// spdlog is shipped pre-compiled
pub const SPDLOG_COMPILED_LIB: &str = "SPDLOG_COMPILED_LIB";

const LAVA_MODULES: [&str; 10] = [
    "lava.engine",
    "lava.app",
    "lava.block",
    "lava.frame",
    "lava.asset",
    "lava.resource",
    "lava.base",
    "lava.file",
    "lava.util",
    "lava.core",
];

const THREAD_FLAG: &str = "-pthread";

/// Linkage metadata for a downstream consumer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerMetadata {
    pub includedirs: Vec<String>,
    pub libdirs: Vec<String>,
    pub bindirs: Vec<String>,
    pub defines: Vec<String>,
    /// Link order matters
    pub libs: Vec<String>,
    pub system_libs: Vec<String>,
    pub sharedlinkflags: Vec<String>,
    pub exelinkflags: Vec<String>,
}

impl ConsumerMetadata {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::IoError(format!("Failed to serialize consumer metadata: {}", e)))
    }
}

/// physfs ships a differently named static archive under MSVC
fn physfs_lib(compiler: Compiler) -> &'static str {
    if compiler == Compiler::Msvc {
        "physfs-static"
    } else {
        "physfs"
    }
}

/// Ordered link libraries for the given compiler
pub fn link_libraries(compiler: Compiler) -> Vec<String> {
    LAVA_MODULES
        .iter()
        .copied()
        .chain(["shaderc_combined", "glfw3", physfs_lib(compiler), "spdlog"])
        .map(str::to_string)
        .collect()
}

fn to_strings(dirs: &[&str]) -> Vec<String> {
    dirs.iter().map(|d| d.to_string()).collect()
}

/// Compute the consumer metadata for an installed package
pub fn package_info(layout: &PackageLayout, settings: &Settings) -> ConsumerMetadata {
    for dir in INCLUDE_DIRS.iter().chain(&LIB_DIRS).chain(&BIN_DIRS) {
        if !layout.root().join(dir).is_dir() {
            debug!("Declared package directory {} is not present", dir);
        }
    }

    let mut info = ConsumerMetadata {
        includedirs: to_strings(&INCLUDE_DIRS),
        libdirs: to_strings(&LIB_DIRS),
        bindirs: to_strings(&BIN_DIRS),
        defines: vec![SPDLOG_COMPILED_LIB.to_string()],
        libs: link_libraries(settings.compiler.name),
        ..ConsumerMetadata::default()
    };

    if settings.libcxx() == Some(Libcxx::Libstdcxx11) {
        info.system_libs.push("stdc++fs".to_string());
    }

    if settings.compiler.name.is_gnu_like() {
        info.sharedlinkflags.push(THREAD_FLAG.to_string());
        info.exelinkflags.push(THREAD_FLAG.to_string());
        info.system_libs.push("dl".to_string());
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Arch, CompilerVersion, Os};
    use std::path::Path;

    fn settings(os: Os, compiler: Compiler) -> Settings {
        Settings::new(os, Arch::X86_64, compiler, CompilerVersion::new(13, 0))
    }

    fn layout() -> PackageLayout {
        PackageLayout::new(Path::new("/nonexistent/liblava-0.8.0"))
    }

    #[test]
    fn test_fixed_directories_and_define() {
        let info = package_info(&layout(), &settings(Os::Linux, Compiler::Gcc));
        assert_eq!(info.includedirs, ["include", "include/liblava/ext"]);
        assert_eq!(info.libdirs, ["lib"]);
        assert_eq!(info.bindirs, ["bin"]);
        assert_eq!(info.defines, ["SPDLOG_COMPILED_LIB"]);
    }

    #[test]
    fn test_link_order() {
        let info = package_info(&layout(), &settings(Os::Linux, Compiler::Gcc));
        assert_eq!(info.libs.first().map(String::as_str), Some("lava.engine"));
        assert_eq!(info.libs[9], "lava.core");
        assert_eq!(
            &info.libs[10..],
            ["shaderc_combined", "glfw3", "physfs", "spdlog"]
        );
    }

    #[test]
    fn test_msvc_uses_static_physfs() {
        let gcc = package_info(&layout(), &settings(Os::Windows, Compiler::Gcc));
        let msvc = package_info(&layout(), &settings(Os::Windows, Compiler::Msvc));
        assert!(msvc.libs.contains(&"physfs-static".to_string()));
        assert!(!msvc.libs.contains(&"physfs".to_string()));

        let differing: Vec<_> = gcc
            .libs
            .iter()
            .zip(&msvc.libs)
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(differing.len(), 1);
    }

    #[test]
    fn test_libstdcxx11_adds_stdcxxfs_once() {
        let s = settings(Os::Linux, Compiler::Gcc).with_libcxx(Libcxx::Libstdcxx11);
        let info = package_info(&layout(), &s);
        assert_eq!(info.system_libs.iter().filter(|l| *l == "stdc++fs").count(), 1);

        let s = settings(Os::Linux, Compiler::Gcc).with_libcxx(Libcxx::Libstdcxx);
        let info = package_info(&layout(), &s);
        assert!(!info.system_libs.contains(&"stdc++fs".to_string()));
    }

    #[test]
    fn test_gnu_like_threads_and_dl() {
        for compiler in [Compiler::Gcc, Compiler::Clang] {
            let info = package_info(&layout(), &settings(Os::Linux, compiler));
            assert_eq!(info.sharedlinkflags, ["-pthread"]);
            assert_eq!(info.exelinkflags, ["-pthread"]);
            assert!(info.system_libs.contains(&"dl".to_string()));
        }
    }

    #[test]
    fn test_msvc_and_apple_clang_have_no_flags() {
        for (os, compiler) in [(Os::Windows, Compiler::Msvc), (Os::Macos, Compiler::AppleClang)] {
            let info = package_info(&layout(), &settings(os, compiler));
            assert!(info.sharedlinkflags.is_empty());
            assert!(info.exelinkflags.is_empty());
            assert!(info.system_libs.is_empty());
        }
    }

    #[test]
    fn test_to_json_round_trip() {
        let info = package_info(&layout(), &settings(Os::Linux, Compiler::Clang));
        let parsed: ConsumerMetadata = serde_json::from_str(&info.to_json().unwrap()).unwrap();
        assert_eq!(parsed, info);
    }
}
