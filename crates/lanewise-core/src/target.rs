//! Target identification and diagnostics

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::primitives::backends::ActiveBackend;
use crate::primitives::Backend;

/// The closed set of backends
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Single-lane reference backend
    Scalar,
    /// Portable 16-byte backend over lane arrays
    Emu128,
    /// x86-64 SSE2 intrinsics
    Sse2,
}

impl Target {
    /// Every target, in order of increasing preference
    pub const ALL: [Target; 3] = [Target::Scalar, Target::Emu128, Target::Sse2];

    /// The target behind [`ActiveBackend`]
    pub const ACTIVE: Target = ActiveBackend::TARGET;

    pub const fn name(self) -> &'static str {
        match self {
            Target::Scalar => "scalar",
            Target::Emu128 => "emu128",
            Target::Sse2 => "sse2",
        }
    }

    /// Whether this build contains the backend
    pub const fn is_compiled(self) -> bool {
        match self {
            Target::Scalar | Target::Emu128 => true,
            Target::Sse2 => cfg!(target_arch = "x86_64"),
        }
    }

    /// Parse a name and check the backend is compiled in
    pub fn require(name: &str) -> Result<Target> {
        let target: Target = name.parse()?;
        if !target.is_compiled() {
            return Err(Error::TargetNotAvailable(format!(
                "{} (not compiled for {})",
                target.name(),
                std::env::consts::ARCH
            )));
        }
        Ok(target)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" => Ok(Target::Scalar),
            "emu128" => Ok(Target::Emu128),
            "sse2" => Ok(Target::Sse2),
            _ => Err(Error::unknown_target(s)),
        }
    }
}

/// Snapshot of the active configuration, for logs and bug reports
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub target: Target,
    pub max_bytes: usize,
    /// Operation families the active backend implements natively
    pub native: Vec<String>,
    /// Targets compiled into this build
    pub compiled: Vec<Target>,
    pub version: String,
}

impl TargetInfo {
    pub fn current() -> Self {
        let info = Self {
            target: ActiveBackend::TARGET,
            max_bytes: ActiveBackend::MAX_BYTES,
            native: ActiveBackend::NATIVE
                .names()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            compiled: Target::ALL.into_iter().filter(|t| t.is_compiled()).collect(),
            version: crate::VERSION.to_string(),
        };
        debug!(
            "Active target {} ({} bytes, {} native op families)",
            info.target,
            info.max_bytes,
            info.native.len()
        );
        info
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
