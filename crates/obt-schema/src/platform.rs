//! Target platform identification.
//!
//! Release assets name their platform with Go-style tokens (`linux_amd64`,
//! `darwin_arm64`, ...). [`Os`] and [`Arch`] carry the canonical token for
//! each platform; vendor spellings are folded into these tokens by
//! [`crate::asset::normalize`].
//!
//! # Example
//!
//! ```
//! use obt_schema::{Arch, Os, Platform};
//!
//! let p = Platform::new(Os::Linux, Arch::Amd64);
//! assert_eq!(p.to_string(), "linux_amd64");
//! ```

use thiserror::Error;

/// Error returned when parsing an OS or architecture name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The OS name is not one obt can install for.
    #[error("Unknown operating system: {0}")]
    UnknownOs(String),
    /// The architecture name is not one obt can install for.
    #[error("Unknown architecture: {0}")]
    UnknownArch(String),
}

/// Operating system of the install target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux-based operating systems.
    Linux,
    /// macOS (named after its kernel, as release assets usually are).
    Darwin,
    /// Microsoft Windows.
    Windows,
    /// FreeBSD.
    FreeBsd,
}

impl Os {
    /// Get the OS obt was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::Darwin
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "freebsd") {
            Self::FreeBsd
        } else {
            Self::Linux
        }
    }

    /// Canonical token as it appears in normalized asset names.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Windows => "windows",
            Self::FreeBsd => "freebsd",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for Os {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "darwin" | "macos" | "osx" => Ok(Self::Darwin),
            "windows" | "win" => Ok(Self::Windows),
            "freebsd" => Ok(Self::FreeBsd),
            _ => Err(PlatformError::UnknownOs(s.to_string())),
        }
    }
}

/// CPU architecture of the install target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// Intel/AMD 64-bit.
    Amd64,
    /// Intel 32-bit.
    I386,
    /// ARM 64-bit.
    Arm64,
    /// ARM 32-bit.
    Arm,
}

impl Arch {
    /// Get the architecture obt was compiled for.
    pub fn current() -> Self {
        if cfg!(target_arch = "aarch64") {
            Self::Arm64
        } else if cfg!(target_arch = "x86") {
            Self::I386
        } else if cfg!(target_arch = "arm") {
            Self::Arm
        } else {
            Self::Amd64
        }
    }

    /// Canonical token as it appears in normalized asset names.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::I386 => "386",
            Self::Arm64 => "arm64",
            Self::Arm => "arm",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for Arch {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "amd64" | "x86_64" | "x64" => Ok(Self::Amd64),
            "386" | "i386" | "i686" | "x86" => Ok(Self::I386),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "arm" | "armv7" | "armv6" => Ok(Self::Arm),
            _ => Err(PlatformError::UnknownArch(s.to_string())),
        }
    }
}

/// An OS and architecture pair that assets are matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Target operating system.
    pub os: Os,
    /// Target CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Build a platform from explicit parts.
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// The platform obt itself runs on.
    pub fn current() -> Self {
        Self::new(Os::current(), Arch::current())
    }

    /// Suffix executables carry on this platform (`.exe` on Windows).
    pub fn exe_suffix(&self) -> &'static str {
        if self.os == Os::Windows { ".exe" } else { "" }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.os, self.arch)
    }
}
