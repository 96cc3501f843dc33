//! Lerna monorepos declared by `lerna.json`.

use std::path::Path;

use serde::Deserialize;

use super::Detector;
use super::globs::resolve_packages;
use super::manifest::read_json;
use crate::core::{MonorepoType, PackageInfo};

pub const LERNA_CONFIG: &str = "lerna.json";

/// Package globs Lerna assumes when `lerna.json` does not list any.
pub const DEFAULT_PACKAGES: &[&str] = &["packages/*"];

#[derive(Debug, Deserialize)]
struct LernaJson {
    #[serde(default)]
    packages: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LernaDetector;

impl LernaDetector {
    pub fn new() -> Self {
        LernaDetector
    }
}

impl Detector for LernaDetector {
    fn kind(&self) -> MonorepoType {
        MonorepoType::Lerna
    }

    fn detect(&self, root: &Path) -> bool {
        root.join(LERNA_CONFIG).is_file()
    }

    fn get_packages(&self, root: &Path) -> Vec<PackageInfo> {
        let Some(config) = read_json::<LernaJson>(&root.join(LERNA_CONFIG)) else {
            return Vec::new();
        };
        match config.packages {
            Some(globs) => resolve_packages(root, &globs),
            None => resolve_packages(root, DEFAULT_PACKAGES),
        }
    }
}
