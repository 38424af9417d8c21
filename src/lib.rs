// src/lib.rs

//! lava-recipe: a build recipe for the liblava Vulkan engine
//!
//! Describes how to fetch, configure, build and package liblava with an
//! external CMake toolchain, and computes the linkage metadata downstream
//! consumers need.
//!
//! # Architecture
//!
//! - Settings are read-only inputs; options are resolved per platform
//! - Phases run strictly in order, each consuming the previous phase's context
//! - External tools (git, cmake) sit behind traits
//! - Consumer metadata is a pure function of settings and the package layout

mod error;
pub mod recipe;
pub mod settings;

pub use error::{Error, Result};
pub use recipe::{
    ConsumerMetadata, CookResult, Kitchen, KitchenConfig, OptionOverrides, Phase, PhaseFailure,
    RecipeIdentity,
};
pub use settings::{Arch, BuildType, Compiler, CompilerVersion, CppStd, Libcxx, Os, Settings};
