//! Environment probes: OS family, editor and local VCS presence.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    /// Platform of the running process. Unknown OS families map to `Windows`.
    pub fn current() -> Self {
        Self::from_os(env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" | "darwin" => Self::Mac,
            "linux" => Self::Linux,
            _ => Self::Windows,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Mac => "mac",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const EDITORS: &[&str] = &["cursor", "cline", "windsurf", "continue"];

/// Source of platform facts for the context analyzer
pub trait PlatformProbe: Send + Sync {
    fn platform(&self) -> Option<Platform>;
    fn has_vcs_repo(&self) -> Option<bool>;
}

/// Probes the live process: OS family and a `.git` marker in `root`
#[derive(Debug, Clone)]
pub struct SystemProbe {
    root: PathBuf,
}

impl SystemProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Probe rooted at the current working directory
    pub fn from_cwd() -> Self {
        Self::new(env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PlatformProbe for SystemProbe {
    fn platform(&self) -> Option<Platform> {
        Some(Platform::current())
    }

    fn has_vcs_repo(&self) -> Option<bool> {
        Some(self.root.join(".git").exists())
    }
}

/// Fixed answers, for tests and for callers that already know the environment
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProbe {
    pub platform: Option<Platform>,
    pub has_vcs_repo: Option<bool>,
}

impl PlatformProbe for StaticProbe {
    fn platform(&self) -> Option<Platform> {
        self.platform
    }

    fn has_vcs_repo(&self) -> Option<bool> {
        self.has_vcs_repo
    }
}

/// Detect the host editor from `CURSOR`/`MCP_CURSOR`-style variables, then from
/// the process arguments.
pub fn editor_from_env() -> Option<&'static str> {
    let from_vars = EDITORS.iter().copied().find(|editor| {
        let upper = editor.to_ascii_uppercase();
        env::var_os(&upper).is_some() || env::var_os(format!("MCP_{upper}")).is_some()
    });
    if from_vars.is_some() {
        return from_vars;
    }
    let args = env::args().collect::<Vec<_>>().join(" ");
    EDITORS.iter().copied().find(|editor| args.contains(editor))
}
