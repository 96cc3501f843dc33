//! Environment detection recorded alongside a diagnostic run.

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

/// Environment information for reproducing a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    pub os: String,

    pub arch: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_sha: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_dirty: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        EnvironmentInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            git_sha: None,
            git_dirty: None,
            node_version: None,
        }
    }
}

impl EnvironmentInfo {
    /// Detect environment information for a project rooted at `root`
    pub fn detect(root: &Path) -> Self {
        EnvironmentInfo {
            git_sha: detect_git_sha(root),
            git_dirty: detect_git_dirty(root),
            node_version: detect_node_version(),
            ..Self::default()
        }
    }
}

/// Detect git SHA from `git rev-parse HEAD`
fn detect_git_sha(root: &Path) -> Option<String> {
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(root)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Detect if git working directory is dirty
fn detect_git_dirty(root: &Path) -> Option<bool> {
    Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(root)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| !o.stdout.is_empty())
}

/// Detect node version from `node --version`
fn detect_node_version() -> Option<String> {
    Command::new("node")
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
