// src/recipe/validate.rs

//! Toolchain preconditions checked before any source is fetched

use crate::error::{Error, Result};
use crate::settings::{Compiler, CompilerVersion, CppStd, Settings};
use std::cmp::Ordering;

/// Minimum C++ standard liblava builds with
pub const MIN_CPPSTD: CppStd = CppStd::new(20);

/// Require `compiler.cppstd` to be declared and at least `min`
///
/// The declared standard must also be one the compiler version can
/// actually provide. GNU-extension variants compare by year.
pub fn check_min_cppstd(settings: &Settings, min: CppStd) -> Result<()> {
    let current = settings.cppstd().ok_or_else(|| {
        Error::Configuration(
            "The compiler.cppstd is not defined for this configuration".to_string(),
        )
    })?;

    if current.cmp_year(&min) == Ordering::Less {
        return Err(Error::Configuration(format!(
            "Current cppstd ({}) is lower than the required C++ standard ({})",
            current, min
        )));
    }

    let compiler = settings.compiler.name;
    let version = settings.compiler.version;
    if let Some(required) = min_compiler_version(compiler, current)
        && version < required
    {
        return Err(Error::Configuration(format!(
            "{} {} does not support C++{} (requires {} or newer)",
            compiler, version, current.year, required.major
        )));
    }

    Ok(())
}

/// Oldest compiler version that accepts a given standard
///
/// Returns `None` for standards every supported compiler handles.
fn min_compiler_version(compiler: Compiler, std: CppStd) -> Option<CompilerVersion> {
    let major = match (compiler, std.year) {
        (Compiler::Gcc, 17) => 5,
        (Compiler::Gcc, 20) => 8,
        (Compiler::Gcc, 23) => 11,
        (Compiler::Gcc, 26) => 14,
        (Compiler::Clang, 17) => 5,
        (Compiler::Clang, 20) => 6,
        (Compiler::Clang, 23) => 12,
        (Compiler::Clang, 26) => 17,
        (Compiler::AppleClang, 17) => 9,
        (Compiler::AppleClang, 20) => 10,
        (Compiler::AppleClang, 23) => 13,
        (Compiler::AppleClang, 26) => 16,
        (Compiler::Msvc, 17) => 191,
        (Compiler::Msvc, 20) => 192,
        (Compiler::Msvc, 23) => 193,
        (Compiler::Msvc, 26) => 194,
        _ => return None,
    };
    Some(CompilerVersion::new(major, 0))
}
