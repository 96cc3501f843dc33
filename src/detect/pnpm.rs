//! PNPM workspaces declared in `pnpm-workspace.yaml`.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use super::Detector;
use super::globs::resolve_packages;
use crate::core::{MonorepoType, PackageInfo};
use crate::{TypelenseError, TypelenseResult};

pub const WORKSPACE_CONFIGURATION_PATH: &str = "pnpm-workspace.yaml";

#[derive(Debug, Default, Deserialize)]
struct PnpmWorkspace {
    #[serde(default)]
    packages: Vec<String>,
}

impl PnpmWorkspace {
    fn from_file(root: &Path) -> TypelenseResult<Self> {
        let path = root.join(WORKSPACE_CONFIGURATION_PATH);
        let contents =
            fs::read_to_string(&path).map_err(|e| TypelenseError::io("failed to read", &path, e))?;
        // An empty document deserializes to nothing rather than an empty mapping.
        let workspace: Option<PnpmWorkspace> = serde_yaml::from_str(&contents).map_err(|e| {
            TypelenseError::Message(format!("failed to parse {}: {e}", path.display()))
        })?;
        Ok(workspace.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PnpmDetector;

impl PnpmDetector {
    pub fn new() -> Self {
        PnpmDetector
    }
}

impl Detector for PnpmDetector {
    fn kind(&self) -> MonorepoType {
        MonorepoType::Pnpm
    }

    fn detect(&self, root: &Path) -> bool {
        root.join(WORKSPACE_CONFIGURATION_PATH).is_file()
    }

    fn get_packages(&self, root: &Path) -> Vec<PackageInfo> {
        if !self.detect(root) {
            return Vec::new();
        }
        match PnpmWorkspace::from_file(root) {
            Ok(workspace) => resolve_packages(root, &workspace.packages),
            Err(e) => {
                warn!("error reading {WORKSPACE_CONFIGURATION_PATH}: {e}");
                Vec::new()
            }
        }
    }
}
