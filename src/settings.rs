// src/settings.rs
//! Host settings supplied by the invoking environment
//!
//! Settings describe the build context (platform, compiler, build type,
//! architecture). They are read-only to the recipe: every phase borrows
//! them and none mutates them. Sub-settings that may be unset
//! (`compiler.libcxx`, `compiler.cppstd`) are looked up through
//! accessors returning `Option`, mirroring a `get_safe` lookup.
//!
//! String spellings follow the usual package-manager conventions:
//! `Windows`, `Linux`, `gcc`, `apple-clang`, `libstdc++11`, `gnu20`.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Target operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    Linux,
    Macos,
    FreeBsd,
    Android,
    Ios,
}

impl Os {
    /// All known operating systems
    pub const ALL: [Os; 6] = [
        Os::Windows,
        Os::Linux,
        Os::Macos,
        Os::FreeBsd,
        Os::Android,
        Os::Ios,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::Macos => "Macos",
            Self::FreeBsd => "FreeBSD",
            Self::Android => "Android",
            Self::Ios => "iOS",
        }
    }
}

impl FromStr for Os {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|os| os.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::ParseError(format!("Unknown os: {}", s)))
    }
}

/// Target architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Armv7 => "armv7",
            Self::Armv8 => "armv8",
        }
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "x86" => Ok(Self::X86),
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "armv7" => Ok(Self::Armv7),
            "armv8" | "aarch64" | "arm64" => Ok(Self::Armv8),
            other => Err(Error::ParseError(format!("Unknown arch: {}", other))),
        }
    }
}

/// Build configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildType {
    #[default]
    Release,
    Debug,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "Release",
            Self::Debug => "Debug",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }
}

impl FromStr for BuildType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Release" => Ok(Self::Release),
            "Debug" => Ok(Self::Debug),
            "RelWithDebInfo" => Ok(Self::RelWithDebInfo),
            "MinSizeRel" => Ok(Self::MinSizeRel),
            other => Err(Error::ParseError(format!("Unknown build_type: {}", other))),
        }
    }
}

/// Compiler family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl Compiler {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple-clang",
            Self::Msvc => "msvc",
        }
    }

    /// Whether the compiler accepts GCC-style driver flags like `-pthread`
    ///
    /// Only `gcc` and `clang` qualify; `apple-clang` is a separate family.
    pub fn is_gnu_like(&self) -> bool {
        matches!(self, Self::Gcc | Self::Clang)
    }
}

impl FromStr for Compiler {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "gcc" => Ok(Self::Gcc),
            "clang" => Ok(Self::Clang),
            "apple-clang" => Ok(Self::AppleClang),
            "msvc" => Ok(Self::Msvc),
            other => Err(Error::ParseError(format!("Unknown compiler: {}", other))),
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// C++ standard library implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Libcxx {
    /// `libstdc++` (pre-C++11 ABI)
    Libstdcxx,
    /// `libstdc++11` (C++11 ABI, needs `stdc++fs` for `<filesystem>` on older GCC)
    Libstdcxx11,
    /// `libc++`
    Libcxx,
    /// `c++_shared` (Android NDK)
    CxxShared,
    /// `c++_static` (Android NDK)
    CxxStatic,
}

impl Libcxx {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Libstdcxx => "libstdc++",
            Self::Libstdcxx11 => "libstdc++11",
            Self::Libcxx => "libc++",
            Self::CxxShared => "c++_shared",
            Self::CxxStatic => "c++_static",
        }
    }
}

impl FromStr for Libcxx {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "libstdc++" => Ok(Self::Libstdcxx),
            "libstdc++11" => Ok(Self::Libstdcxx11),
            "libc++" => Ok(Self::Libcxx),
            "c++_shared" => Ok(Self::CxxShared),
            "c++_static" => Ok(Self::CxxStatic),
            other => Err(Error::ParseError(format!("Unknown libcxx: {}", other))),
        }
    }
}

/// A C++ language standard, optionally with GNU extensions (`gnu20`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CppStd {
    /// Two-digit standard year (98, 11, 14, 17, 20, 23, 26)
    pub year: u8,
    /// GNU extensions enabled
    pub gnu: bool,
}

impl CppStd {
    pub const fn new(year: u8) -> Self {
        Self { year, gnu: false }
    }

    /// Chronological rank; 98 sorts before 11
    fn rank(&self) -> u16 {
        if self.year >= 90 {
            1900 + self.year as u16
        } else {
            2000 + self.year as u16
        }
    }

    /// Compare standards by year alone, ignoring GNU extensions
    pub fn cmp_year(&self, other: &CppStd) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl FromStr for CppStd {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (gnu, digits) = match s.strip_prefix("gnu") {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let year: u8 = digits
            .parse()
            .map_err(|_| Error::ParseError(format!("Invalid cppstd: {}", s)))?;
        if ![98, 11, 14, 17, 20, 23, 26].contains(&year) {
            return Err(Error::ParseError(format!("Unknown cppstd: {}", s)));
        }
        Ok(Self { year, gnu })
    }
}

impl fmt::Display for CppStd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gnu {
            write!(f, "gnu{:02}", self.year)
        } else {
            write!(f, "{:02}", self.year)
        }
    }
}

/// A compiler version such as `13`, `13.2` or `193`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompilerVersion {
    pub major: u32,
    pub minor: u32,
}

impl CompilerVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl FromStr for CompilerVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut parts = s.split('.');
        let parse = |part: Option<&str>| -> Result<u32> {
            match part {
                Some(p) => p
                    .parse()
                    .map_err(|_| Error::ParseError(format!("Invalid compiler version: {}", s))),
                None => Ok(0),
            }
        };
        let major = match parts.next() {
            Some(p) if !p.is_empty() => parse(Some(p))?,
            _ => return Err(Error::ParseError("Empty compiler version".to_string())),
        };
        let minor = parse(parts.next())?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for CompilerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Compiler-related sub-settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSettings {
    pub name: Compiler,
    pub version: CompilerVersion,
    pub libcxx: Option<Libcxx>,
    pub cppstd: Option<CppStd>,
}

/// The complete, immutable host settings for one recipe invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub os: Os,
    pub arch: Arch,
    pub build_type: BuildType,
    pub compiler: CompilerSettings,
}

impl Settings {
    /// Create settings with no optional sub-settings
    pub fn new(os: Os, arch: Arch, compiler: Compiler, version: CompilerVersion) -> Self {
        Self {
            os,
            arch,
            build_type: BuildType::default(),
            compiler: CompilerSettings {
                name: compiler,
                version,
                libcxx: None,
                cppstd: None,
            },
        }
    }

    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    pub fn with_libcxx(mut self, libcxx: Libcxx) -> Self {
        self.compiler.libcxx = Some(libcxx);
        self
    }

    pub fn with_cppstd(mut self, cppstd: CppStd) -> Self {
        self.compiler.cppstd = Some(cppstd);
        self
    }

    /// `compiler.libcxx`, or `None` when unset
    pub fn libcxx(&self) -> Option<Libcxx> {
        self.compiler.libcxx
    }

    /// `compiler.cppstd`, or `None` when unset
    pub fn cppstd(&self) -> Option<CppStd> {
        self.compiler.cppstd
    }
}
