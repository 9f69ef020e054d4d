use std::fmt;

use crate::storage::DEFAULT_STORAGE_KEY;

const UNKNOWN: &str = "unknown";

/// State of the working tree the binary was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    Clean,
    Modified,
    Unknown,
}

impl TreeState {
    fn from_build_flag(flag: &str) -> Self {
        match flag {
            "clean" => Self::Clean,
            "dirty" => Self::Modified,
            _ => Self::Unknown,
        }
    }
}

/// What `version` reports about this binary.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub tree: TreeState,
    pub built_at: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
    pub storage_slot: &'static str,
}

impl BuildInfo {
    /// Label/value pairs in the order the shell prints them.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let commit = match self.tree {
            TreeState::Clean => self.commit.to_string(),
            TreeState::Modified => format!("{} (modified)", self.commit),
            TreeState::Unknown => format!("{} (tree state unknown)", self.commit),
        };
        vec![
            ("Commit", commit),
            ("Built at", self.built_at.to_string()),
            ("Target", format!("{} ({})", self.target, self.profile)),
            ("Rustc", self.rustc.to_string()),
            ("Storage slot", self.storage_slot.to_string()),
        ]
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "daily_ledger {} ({}", self.version, self.commit)?;
        if self.tree == TreeState::Modified {
            f.write_str("+")?;
        }
        write!(f, ", {})", self.profile)
    }
}

/// Metadata embedded by `build.rs`; fields it could not determine read `unknown`.
pub fn current() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("DAILY_LEDGER_BUILD_HASH").unwrap_or(UNKNOWN),
        tree: TreeState::from_build_flag(option_env!("DAILY_LEDGER_BUILD_STATUS").unwrap_or(UNKNOWN)),
        built_at: option_env!("DAILY_LEDGER_BUILD_TIMESTAMP").unwrap_or(UNKNOWN),
        target: option_env!("DAILY_LEDGER_BUILD_TARGET").unwrap_or(UNKNOWN),
        profile: option_env!("DAILY_LEDGER_BUILD_PROFILE").unwrap_or(UNKNOWN),
        rustc: option_env!("DAILY_LEDGER_BUILD_RUSTC").unwrap_or(UNKNOWN),
        storage_slot: DEFAULT_STORAGE_KEY,
    }
}
