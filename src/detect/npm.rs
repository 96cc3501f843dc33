//! NPM (and Yarn classic) workspaces declared in the root `package.json`.

use std::path::Path;

use super::Detector;
use super::globs::resolve_packages;
use super::manifest::{PackageJson, read_json};
use crate::core::{MonorepoType, PackageInfo};

pub const ROOT_MANIFEST: &str = "package.json";

#[derive(Debug, Clone, Copy, Default)]
pub struct NpmDetector;

impl NpmDetector {
    pub fn new() -> Self {
        NpmDetector
    }

    /// The workspace globs declared by the root manifest, if any.
    fn workspace_globs(&self, root: &Path) -> Option<Vec<String>> {
        let manifest: PackageJson = read_json(&root.join(ROOT_MANIFEST))?;
        manifest.workspaces.map(Into::into)
    }
}

impl Detector for NpmDetector {
    fn kind(&self) -> MonorepoType {
        MonorepoType::Npm
    }

    fn detect(&self, root: &Path) -> bool {
        self.workspace_globs(root).is_some()
    }

    fn get_packages(&self, root: &Path) -> Vec<PackageInfo> {
        match self.workspace_globs(root) {
            Some(globs) => resolve_packages(root, &globs),
            None => Vec::new(),
        }
    }
}
