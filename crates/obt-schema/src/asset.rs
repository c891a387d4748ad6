//! Release asset name matching.
//!
//! Vendors name their release attachments inconsistently: `tool-1.2.0-linux-amd64.tar.gz`,
//! `tool_Linux_x86_64.zip`, `tool-v1.2.0-x86_64-unknown-linux-gnu.tar.gz`. Matching works on a
//! normalized form of the name (lower-cased, `-` folded to `_`, vendor architecture spellings
//! folded to the platform's canonical token) and checks for the OS and architecture tokens on
//! word boundaries.

use serde::{Deserialize, Serialize};

use crate::platform::{Arch, Os, Platform};

/// Suffixes of OS packages that obt never tries to unpack.
pub const PACKAGE_SUFFIXES: &[&str] = &["deb", "rpm", "msi", "apk"];

/// Checksums, signatures and other sidecars that ride along with binaries.
const SIDECAR_SUFFIXES: &[&str] = &[
    "sha256", "sha256sum", "sha512", "md5", "sig", "asc", "pem", "sbom",
];

/// Container encoding wrapping the executable inside an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerFormat {
    /// The asset is the executable itself.
    RawBinary,
    /// Gzip-compressed tar archive (`.tar.gz`, `.tgz`).
    TarGzip,
    /// A single gzip-compressed executable (`.gz`, `.gzip`).
    Gzip,
    /// Zip archive (`.zip`).
    Zip,
    /// XZ-compressed tar archive (`.tar.xz`, `.txz`).
    TarXz,
}

impl ContainerFormat {
    /// Detect the format from an asset file name, most specific suffix first.
    #[allow(clippy::case_sensitive_file_extension_comparisons)] // lowercased above
    pub fn from_name(name: &str) -> Self {
        let n = name.to_lowercase();

        if n.ends_with(".tar.gz") || n.ends_with(".tgz") {
            Self::TarGzip
        } else if n.ends_with(".tar.xz") || n.ends_with(".txz") {
            Self::TarXz
        } else if n.ends_with(".zip") {
            Self::Zip
        } else if n.ends_with(".gz") || n.ends_with(".gzip") {
            Self::Gzip
        } else {
            Self::RawBinary
        }
    }

    /// Short human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RawBinary => "binary",
            Self::TarGzip => "tar.gz",
            Self::Gzip => "gzip",
            Self::Zip => "zip",
            Self::TarXz => "tar.xz",
        }
    }

}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// The asset is the binary for the target platform.
    pub accepted: bool,
    /// Container format, derived from the suffix regardless of `accepted`.
    pub format: ContainerFormat,
}

/// True if the name ends with an OS package suffix (`deb`, `rpm`, `msi`, `apk`),
/// with or without a leading dot.
pub fn is_package(name: &str) -> bool {
    let n = name.to_lowercase();
    PACKAGE_SUFFIXES.iter().any(|s| n.ends_with(s))
}

/// True if the name is a checksum/signature sidecar rather than an artifact.
pub fn is_sidecar(name: &str) -> bool {
    let n = name.to_lowercase();
    SIDECAR_SUFFIXES
        .iter()
        .any(|s| n.strip_suffix(*s).is_some_and(|rest| rest.ends_with('.')))
}

/// Normalize an asset name for matching against `platform`.
///
/// Folds `-` into `_`, lower-cases, then rewrites vendor spellings of the
/// target architecture (and the macOS OS names) into the canonical tokens.
/// Applying it twice gives the same result as applying it once.
pub fn normalize(name: &str, platform: Platform) -> String {
    let mut n = name.replace('-', "_").to_lowercase();

    match platform.arch {
        Arch::Amd64 => {
            n = n
                .replace("x86_64", "amd64")
                .replace("64bit", "amd64")
                .replace("x64", "amd64");
        }
        Arch::I386 => {
            // 64-bit spellings first, or `x86_64` would alias to `386_64`
            n = n
                .replace("x86_64", "amd64")
                .replace("i386", "386")
                .replace("i686", "386")
                .replace("x86", "386")
                .replace("32bit", "386");
        }
        Arch::Arm64 => {
            n = n.replace("aarch64", "arm64");
        }
        Arch::Arm => {
            // suffixed spellings first, or `armv7l` would leave `arml`
            n = n
                .replace("armv7l", "arm")
                .replace("armv6l", "arm")
                .replace("armel", "arm")
                .replace("armv7", "arm")
                .replace("armv6", "arm")
                .replace("armhf", "arm");
        }
    }

    if platform.os == Os::Darwin {
        n = n.replace("macos", "darwin").replace("osx", "darwin");
    }

    n
}

/// Check that `token` occurs in `haystack` with no ASCII alphanumeric on either side.
///
/// Keeps `arm` from matching inside `arm64` and `linux` inside `linuxbrew`.
pub fn contains_token(haystack: &str, token: &str) -> bool {
    let bytes = haystack.as_bytes();
    haystack.match_indices(token).any(|(start, m)| {
        let end = start + m.len();
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        before_ok && after_ok
    })
}

/// Decide whether `name` is the binary for `platform`, and how it is packaged.
///
/// `prefix` is the expected leading part of the file name (usually the binary
/// name). It is normalized the same way the asset name is.
pub fn classify(name: &str, prefix: &str, platform: Platform) -> Classification {
    let format = ContainerFormat::from_name(name);

    if is_package(name) || is_sidecar(name) {
        return Classification {
            accepted: false,
            format,
        };
    }

    Classification {
        accepted: matches_platform(name, prefix, platform),
        format,
    }
}

/// Prefix and platform check alone, without looking at the suffix.
///
/// Lets callers tell "no asset for this platform" apart from "only a `.deb`
/// for this platform".
pub fn matches_platform(name: &str, prefix: &str, platform: Platform) -> bool {
    let normalized = normalize(name, platform);
    let prefix = prefix.replace('-', "_").to_lowercase();

    normalized.starts_with(&prefix)
        && contains_token(&normalized, platform.os.token())
        && contains_token(&normalized, platform.arch.token())
}

/// Guess the binary prefix from the first asset of a release.
///
/// `tool_1.0_linux_amd64.tar.gz` gives `tool`; a name without `_` falls back
/// to the repository name.
pub fn infer_binary_prefix(first_asset: &str, repo: &str) -> String {
    let mut parts = first_asset.split('_');
    match (parts.next(), parts.next()) {
        (Some(head), Some(_)) => head.to_string(),
        _ => repo.to_string(),
    }
}
