//! Target platform identifiers.
//!
//! Capabilities may declare the platforms that own them. On any other
//! platform the capability is never probed and resolves as disabled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SdkgateError;

/// Platform a build is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Win64,
    Linux,
    LinuxArm64,
    Mac,
}

impl PlatformId {
    /// Every supported platform, in display order.
    pub const ALL: [PlatformId; 4] = [
        PlatformId::Win64,
        PlatformId::Linux,
        PlatformId::LinuxArm64,
        PlatformId::Mac,
    ];

    /// Detect the platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            PlatformId::Win64
        } else if cfg!(target_os = "macos") {
            PlatformId::Mac
        } else if cfg!(target_arch = "aarch64") {
            PlatformId::LinuxArm64
        } else {
            PlatformId::Linux
        }
    }

    /// Canonical lowercase name, as used in capability tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::Win64 => "win64",
            PlatformId::Linux => "linux",
            PlatformId::LinuxArm64 => "linuxarm64",
            PlatformId::Mac => "mac",
        }
    }

    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = SdkgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "win64" | "windows" => Ok(PlatformId::Win64),
            "linux" => Ok(PlatformId::Linux),
            "linuxarm64" | "linux-arm64" | "linuxaarch64" => Ok(PlatformId::LinuxArm64),
            "mac" | "macos" => Ok(PlatformId::Mac),
            _ => Err(SdkgateError::InvalidPlatform {
                value: s.to_string(),
                expected: Self::expected(),
            }),
        }
    }
}
