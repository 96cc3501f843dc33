use std::path::PathBuf;

use tracing::{info, warn};

use crate::core::MonorepoType;
use crate::detect::{Detection, DetectorRegistry};
use crate::TypelenseResult;

/// Detect the monorepo convention at `root` (or use `forced`) and list its packages.
///
/// Returns `None` when the repository is not recognized.
pub fn detect(root: &std::path::Path, forced: Option<MonorepoType>) -> Option<Detection> {
    let registry = DetectorRegistry::new();
    match forced {
        Some(kind) => {
            let detector = registry.get(kind)?;
            if !detector.detect(root) {
                warn!("{kind} markers not found at {}, listing packages anyway", root.display());
            }
            Some(Detection {
                monorepo_type: kind,
                packages: detector.get_packages(root),
            })
        }
        None => registry.discover(root),
    }
}

pub fn run(root: PathBuf, forced: Option<MonorepoType>, json: bool) -> TypelenseResult<()> {
    let Some(detection) = detect(&root, forced) else {
        warn!("no supported monorepo configuration found at {}", root.display());
        return Ok(());
    };
    info!(
        "detected {} monorepo with {} package(s)",
        detection.monorepo_type,
        detection.packages.len()
    );

    if json {
        let out = serde_json::to_string_pretty(&detection)?;
        println!("{out}");
    } else {
        println!("{}", detection.monorepo_type);
        for pkg in &detection.packages {
            match &pkg.version {
                Some(v) => println!("  {}@{}\t{}", pkg.name, v, pkg.path.display()),
                None => println!("  {}\t{}", pkg.name, pkg.path.display()),
            }
        }
    }
    Ok(())
}
