//! Turborepo. Turbo has no package glob syntax of its own and relies on the
//! underlying package manager's workspace declaration.

use std::path::Path;

use super::Detector;
use super::npm::NpmDetector;
use super::pnpm::PnpmDetector;
use crate::core::{MonorepoType, PackageInfo};

pub const TURBO_CONFIG: &str = "turbo.json";

#[derive(Debug, Clone, Copy, Default)]
pub struct TurboDetector {
    npm: NpmDetector,
    pnpm: PnpmDetector,
}

impl TurboDetector {
    pub fn new() -> Self {
        TurboDetector::default()
    }
}

impl Detector for TurboDetector {
    fn kind(&self) -> MonorepoType {
        MonorepoType::Turbo
    }

    fn detect(&self, root: &Path) -> bool {
        if !root.join(TURBO_CONFIG).is_file() {
            return false;
        }
        self.npm.detect(root) || self.pnpm.detect(root)
    }

    fn get_packages(&self, root: &Path) -> Vec<PackageInfo> {
        if self.pnpm.detect(root) {
            self.pnpm.get_packages(root)
        } else {
            self.npm.get_packages(root)
        }
    }
}
