// src/recipe/profile.rs

//! Profile parsing
//!
//! A profile bundles host settings and option overrides in TOML:
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! arch = "x86_64"
//! build_type = "Release"
//!
//! [settings.compiler]
//! name = "gcc"
//! version = "13"
//! libcxx = "libstdc++11"
//! cppstd = "20"
//!
//! [options]
//! test = true
//! ```

use crate::error::{Error, Result};
use crate::recipe::options::OptionOverrides;
use crate::settings::{CompilerSettings, Settings};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ProfileFile {
    settings: SettingsTable,
    #[serde(default)]
    options: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct SettingsTable {
    os: String,
    arch: String,
    #[serde(default)]
    build_type: Option<String>,
    compiler: CompilerTable,
}

#[derive(Debug, Deserialize)]
struct CompilerTable {
    name: String,
    version: toml::Value,
    #[serde(default)]
    libcxx: Option<String>,
    #[serde(default)]
    cppstd: Option<toml::Value>,
}

/// Settings plus option overrides loaded from a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub settings: Settings,
    pub options: OptionOverrides,
}

/// Parse a profile from a TOML string
pub fn parse_profile(content: &str) -> Result<Profile> {
    let file: ProfileFile =
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid profile: {}", e)))?;

    let s = file.settings;
    let compiler = CompilerSettings {
        name: s.compiler.name.parse()?,
        version: version_scalar("compiler.version", &s.compiler.version)?.parse()?,
        libcxx: s.compiler.libcxx.as_deref().map(str::parse).transpose()?,
        cppstd: s
            .compiler
            .cppstd
            .as_ref()
            .map(|v| version_scalar("compiler.cppstd", v).and_then(|s| s.parse()))
            .transpose()?,
    };

    let settings = Settings {
        os: s.os.parse()?,
        arch: s.arch.parse()?,
        build_type: match s.build_type {
            Some(bt) => bt.parse()?,
            None => Default::default(),
        },
        compiler,
    };

    let mut options = OptionOverrides::new();
    for (key, value) in &file.options {
        options = options.set(key, &scalar(key, value)?);
    }

    Ok(Profile { settings, options })
}

/// Parse a profile from a file
pub fn parse_profile_file(path: &Path) -> Result<Profile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read profile {}: {}", path.display(), e)))?;

    parse_profile(&content)
}

/// Like [`scalar`], but floats are rejected: `13.10` would read back as `13.1`
fn version_scalar(key: &str, value: &toml::Value) -> Result<String> {
    if let toml::Value::Float(f) = value {
        return Err(Error::ParseError(format!(
            "{} must be an integer or a quoted string, got float {}; quote versions as strings",
            key, f
        )));
    }
    scalar(key, value)
}

/// Render a scalar TOML value as the string a setting or option expects
fn scalar(key: &str, value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(if *b { "True" } else { "False" }.to_string()),
        other => Err(Error::ParseError(format!(
            "{} must be a string, number or boolean, got {}",
            key,
            other.type_str()
        ))),
    }
}
