// src/recipe/options.rs

//! Option schema resolution
//!
//! The schema is computed from the target platform by a pure function:
//! every declared option ends up either [`OptionSlot::Present`] with its
//! domain and default, or [`OptionSlot::Absent`] when the platform has no
//! use for it. Nothing mutates a schema once resolved.
//!
//! Lookups of an absent option yield `None` rather than an error, and
//! consumers treat `None` as off.

use crate::error::{Error, Result};
use crate::settings::Os;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Keys of the user-facing recipe options, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKey {
    /// Position-independent code
    Fpic,
    /// Build the internal test target
    Test,
    /// Build the internal demo target
    Demo,
}

impl OptionKey {
    pub const ALL: [OptionKey; 3] = [OptionKey::Fpic, OptionKey::Test, OptionKey::Demo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fpic => "fPIC",
            Self::Test => "test",
            Self::Demo => "demo",
        }
    }
}

impl FromStr for OptionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidOption(format!("Unknown option: {}", s)))
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving one declared option against the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSlot {
    Present { domain: Vec<bool>, default: bool },
    Absent,
}

impl OptionSlot {
    fn boolean(default: bool) -> Self {
        Self::Present {
            domain: vec![true, false],
            default,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    /// Default value, or `None` when the option is absent
    pub fn default_value(&self) -> Option<bool> {
        match self {
            Self::Present { default, .. } => Some(*default),
            Self::Absent => None,
        }
    }
}

/// Effective option schema for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSchema {
    slots: Vec<(OptionKey, OptionSlot)>,
}

/// Resolve the option schema for a target OS
///
/// `fPIC` is meaningless on Windows and is absent there.
pub fn resolve_schema(os: Os) -> OptionSchema {
    let fpic = if os == Os::Windows {
        OptionSlot::Absent
    } else {
        OptionSlot::boolean(true)
    };

    OptionSchema {
        slots: vec![
            (OptionKey::Fpic, fpic),
            (OptionKey::Test, OptionSlot::boolean(false)),
            (OptionKey::Demo, OptionSlot::boolean(false)),
        ],
    }
}

impl OptionSchema {
    /// Slot for a key; every declared key has one
    pub fn slot(&self, key: OptionKey) -> &OptionSlot {
        self.slots
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, slot)| slot)
            .unwrap_or(&OptionSlot::Absent)
    }

    /// Keys present on this platform, in declaration order
    pub fn present_keys(&self) -> impl Iterator<Item = OptionKey> + '_ {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.is_present())
            .map(|(k, _)| *k)
    }

    /// Combine the schema with user overrides
    ///
    /// Unknown keys and values outside an option's domain are rejected.
    /// An override for an option the platform removed is ignored.
    pub fn resolve(&self, overrides: &OptionOverrides) -> Result<ResolvedOptions> {
        let mut values: BTreeMap<OptionKey, bool> = self
            .slots
            .iter()
            .filter_map(|(k, slot)| slot.default_value().map(|d| (*k, d)))
            .collect();

        for (raw_key, raw_value) in &overrides.values {
            let key: OptionKey = raw_key.parse()?;
            match self.slot(key) {
                OptionSlot::Absent => {
                    warn!(
                        "Ignoring override {}={}: option not available on this platform",
                        key, raw_value
                    );
                }
                OptionSlot::Present { domain, .. } => {
                    let value = parse_bool(raw_value).ok_or_else(|| {
                        Error::InvalidOption(format!(
                            "'{}' is not a valid value for option {} (expected true or false)",
                            raw_value, key
                        ))
                    })?;
                    if !domain.contains(&value) {
                        return Err(Error::InvalidOption(format!(
                            "'{}' is outside the domain of option {}",
                            raw_value, key
                        )));
                    }
                    debug!("Option override: {}={}", key, value);
                    values.insert(key, value);
                }
            }
        }

        Ok(ResolvedOptions { values })
    }
}

/// User-supplied option overrides, keyed by option name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    values: BTreeMap<String, String>,
}

impl OptionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one override
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.trim().to_string(), value.trim().to_string());
        self
    }

    /// Parse a `key=value` override
    pub fn parse(spec: &str) -> Result<(String, String)> {
        let (key, value) = spec
            .split_once('=')
            .ok_or_else(|| Error::InvalidOption(format!("Expected key=value, got '{}'", spec)))?;
        if key.trim().is_empty() {
            return Err(Error::InvalidOption(format!("Missing option name in '{}'", spec)));
        }
        Ok((key.trim().to_string(), value.trim().to_string()))
    }

    /// Build overrides from a list of `key=value` strings
    pub fn from_specs<I, S>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = Self::new();
        for spec in specs {
            let (key, value) = Self::parse(spec.as_ref())?;
            overrides.values.insert(key, value);
        }
        Ok(overrides)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "True" | "true" | "ON" | "on" | "1" => Some(true),
        "False" | "false" | "OFF" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Final option values; exactly one per option present in the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    values: BTreeMap<OptionKey, bool>,
}

impl ResolvedOptions {
    /// Value of an option, or `None` when the platform removed it
    pub fn get_safe(&self, key: OptionKey) -> Option<bool> {
        self.values.get(&key).copied()
    }

    /// Value of an option with absence treated as off
    pub fn enabled(&self, key: OptionKey) -> bool {
        self.get_safe(key).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, bool)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fpic_absent_on_windows() {
        let schema = resolve_schema(Os::Windows);
        assert_eq!(schema.slot(OptionKey::Fpic), &OptionSlot::Absent);

        let resolved = schema.resolve(&OptionOverrides::new()).unwrap();
        assert_eq!(resolved.get_safe(OptionKey::Fpic), None);
        assert!(!resolved.enabled(OptionKey::Fpic));
    }

    #[test]
    fn test_fpic_present_elsewhere() {
        for os in Os::ALL.into_iter().filter(|os| *os != Os::Windows) {
            let schema = resolve_schema(os);
            assert_eq!(
                schema.slot(OptionKey::Fpic),
                &OptionSlot::Present {
                    domain: vec![true, false],
                    default: true
                },
                "fPIC should be present on {}",
                os.as_str()
            );
        }
    }

    #[test]
    fn test_defaults_round_trip() {
        let resolved = resolve_schema(Os::Linux)
            .resolve(&OptionOverrides::new())
            .unwrap();
        assert_eq!(resolved.get_safe(OptionKey::Fpic), Some(true));
        assert_eq!(resolved.get_safe(OptionKey::Test), Some(false));
        assert_eq!(resolved.get_safe(OptionKey::Demo), Some(false));
        assert_eq!(resolved.len(), 3);

        let resolved = resolve_schema(Os::Windows)
            .resolve(&OptionOverrides::new())
            .unwrap();
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_override_applied() {
        let overrides = OptionOverrides::from_specs(["test=True", "fPIC=False"]).unwrap();
        let resolved = resolve_schema(Os::Linux).resolve(&overrides).unwrap();
        assert_eq!(resolved.get_safe(OptionKey::Test), Some(true));
        assert_eq!(resolved.get_safe(OptionKey::Fpic), Some(false));
        assert_eq!(resolved.get_safe(OptionKey::Demo), Some(false));
    }

    #[test]
    fn test_override_for_removed_option_is_ignored() {
        let overrides = OptionOverrides::new().set("fPIC", "True");
        let resolved = resolve_schema(Os::Windows).resolve(&overrides).unwrap();
        assert_eq!(resolved.get_safe(OptionKey::Fpic), None);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let overrides = OptionOverrides::new().set("template", "True");
        let err = resolve_schema(Os::Linux).resolve(&overrides).unwrap_err();
        assert!(matches!(err, Error::InvalidOption(_)));
    }

    #[test]
    fn test_bad_value_rejected() {
        let overrides = OptionOverrides::new().set("demo", "maybe");
        let err = resolve_schema(Os::Linux).resolve(&overrides).unwrap_err();
        assert!(matches!(err, Error::InvalidOption(ref m) if m.contains("maybe")));
    }

    #[test]
    fn test_parse_spec() {
        assert_eq!(
            OptionOverrides::parse(" demo = ON ").unwrap(),
            ("demo".to_string(), "ON".to_string())
        );
        assert!(OptionOverrides::parse("demo").is_err());
        assert!(OptionOverrides::parse("=True").is_err());
    }

    #[test]
    fn test_present_keys_order() {
        let keys: Vec<_> = resolve_schema(Os::Windows).present_keys().collect();
        assert_eq!(keys, vec![OptionKey::Test, OptionKey::Demo]);
    }
}
