//! Ordered detector selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Detector, LernaDetector, NpmDetector, PnpmDetector, TurboDetector};
use crate::core::{MonorepoType, PackageInfo};

/// Result of detecting a root: the convention in use and its packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub monorepo_type: MonorepoType,
    pub packages: Vec<PackageInfo>,
}

/// All known detectors in priority order.
///
/// Composite detectors come before the detectors they delegate to, so a
/// Turbo repository backed by PNPM is reported as Turbo.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorRegistry {
    pub fn new() -> Self {
        DetectorRegistry {
            detectors: vec![
                Box::new(TurboDetector::new()),
                Box::new(LernaDetector::new()),
                Box::new(PnpmDetector::new()),
                Box::new(NpmDetector::new()),
            ],
        }
    }

    /// Detector tags in evaluation order.
    pub fn order(&self) -> Vec<MonorepoType> {
        self.detectors.iter().map(|d| d.kind()).collect()
    }

    /// Look up the detector owning `kind`.
    pub fn get(&self, kind: MonorepoType) -> Option<&dyn Detector> {
        self.detectors
            .iter()
            .find(|d| d.kind() == kind)
            .map(|d| &**d)
    }

    /// First detector that applies at `root`, or `None` if unrecognized.
    pub fn detect(&self, root: &Path) -> Option<&dyn Detector> {
        let found = self
            .detectors
            .iter()
            .find(|d| d.detect(root))
            .map(|d| &**d);
        match found {
            Some(d) => debug!("detected {} at {}", d.kind(), root.display()),
            None => debug!("no monorepo convention recognized at {}", root.display()),
        }
        found
    }

    /// Every detector that applies at `root`, in priority order.
    pub fn detect_all(&self, root: &Path) -> Vec<MonorepoType> {
        self.detectors
            .iter()
            .filter(|d| d.detect(root))
            .map(|d| d.kind())
            .collect()
    }

    /// Detect the convention at `root` and list its packages.
    pub fn discover(&self, root: &Path) -> Option<Detection> {
        let detector = self.detect(root)?;
        Some(Detection {
            monorepo_type: detector.kind(),
            packages: detector.get_packages(root),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::test_support::{write_file, write_package};

    #[test]
    fn test_composite_detectors_come_first() {
        let registry = DetectorRegistry::new();
        let order = registry.order();
        let pos = |k| order.iter().position(|t| *t == k).unwrap();
        assert!(pos(MonorepoType::Turbo) < pos(MonorepoType::Pnpm));
        assert!(pos(MonorepoType::Turbo) < pos(MonorepoType::Npm));
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn test_turbo_pnpm_repo_is_turbo() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "turbo.json", "{}");
        write_file(dir.path(), "pnpm-workspace.yaml", "packages:\n  - packages/*\n");
        write_package(dir.path(), "packages/a", "a", None);

        let registry = DetectorRegistry::new();
        let detection = registry.discover(dir.path()).unwrap();
        assert_eq!(detection.monorepo_type, MonorepoType::Turbo);
        assert_eq!(detection.packages.len(), 1);
        assert_eq!(
            registry.detect_all(dir.path()),
            vec![MonorepoType::Turbo, MonorepoType::Pnpm]
        );
    }

    #[test]
    fn test_plain_npm_repo() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "package.json", r#"{"workspaces":["packages/*"]}"#);
        write_package(dir.path(), "packages/a", "a", None);

        let detection = DetectorRegistry::new().discover(dir.path()).unwrap();
        assert_eq!(detection.monorepo_type, MonorepoType::Npm);
        assert_eq!(detection.packages[0].name, "a");
    }

    #[test]
    fn test_unrecognized_root() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "package.json", r#"{"name":"solo"}"#);

        let registry = DetectorRegistry::new();
        assert!(registry.detect(dir.path()).is_none());
        assert!(registry.discover(dir.path()).is_none());
        assert!(registry.detect_all(dir.path()).is_empty());
    }

    #[test]
    fn test_get_by_kind() {
        let registry = DetectorRegistry::new();
        for kind in [
            MonorepoType::Npm,
            MonorepoType::Pnpm,
            MonorepoType::Lerna,
            MonorepoType::Turbo,
        ] {
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
    }
}
