// src/recipe/mod.rs

//! The liblava recipe
//!
//! A recipe describes how to fetch, configure, build and package liblava,
//! and which metadata a consumer needs to link against it. The heavy
//! lifting (cloning, compiling, linking) is done by external tools; the
//! recipe only decides what to ask them for.
//!
//! # Phases
//!
//! - **Configure**: resolve the option schema for the target platform
//! - **Validate**: require C++20 from the active toolchain
//! - **Source**: check out the tag matching the recipe version
//! - **Generate**: emit the CMake toolchain and dependency manifest
//! - **Build**: CMake configure and build
//! - **Package**: CMake install, prune `lib/cmake`, copy the license
//! - **Package info**: compute the consumer metadata
//!
//! # Example Profile
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! arch = "x86_64"
//!
//! [settings.compiler]
//! name = "gcc"
//! version = "13"
//! libcxx = "libstdc++11"
//! cppstd = "20"
//!
//! [options]
//! demo = true
//! ```

pub mod generate;
mod identity;
pub mod kitchen;
pub mod options;
pub mod package_info;
pub mod profile;
pub mod source;
pub mod validate;

pub use generate::{GeneratedConfig, ToolchainVariable};
pub use identity::RecipeIdentity;
pub use kitchen::{CookResult, Kitchen, KitchenConfig, PackageLayout, Phase, PhaseFailure};
pub use options::{
    resolve_schema, OptionKey, OptionOverrides, OptionSchema, OptionSlot, ResolvedOptions,
};
pub use package_info::ConsumerMetadata;
pub use profile::{parse_profile, parse_profile_file, Profile};
pub use source::{GitTransport, SourceSnapshot, SourceTransport};
