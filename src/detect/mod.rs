//! Monorepo workspace detection.
//!
//! Each supported convention (NPM workspaces, PNPM workspaces, Lerna, Turbo)
//! has a `Detector` that answers two questions about a project root: does the
//! convention apply, and which member packages does it declare.
//! `DetectorRegistry` picks the first detector that applies, in priority order.

pub mod globs;
pub mod lerna;
pub mod manifest;
pub mod npm;
pub mod pnpm;
pub mod registry;
pub mod turbo;

use std::path::Path;

use crate::core::{MonorepoType, PackageInfo};

// Re-export key types
pub use globs::resolve_packages;
pub use lerna::LernaDetector;
pub use npm::NpmDetector;
pub use pnpm::PnpmDetector;
pub use registry::{Detection, DetectorRegistry};
pub use turbo::TurboDetector;

/// A monorepo convention detector.
///
/// Neither method reports errors: unreadable or malformed configuration is
/// treated as "not detected" or as an empty package list.
pub trait Detector: Send + Sync {
    /// The convention this detector owns.
    fn kind(&self) -> MonorepoType;

    /// Returns true if the convention applies at `root`. Never mutates anything.
    fn detect(&self, root: &Path) -> bool;

    /// Lists the packages the convention declares at `root`, in glob match order.
    ///
    /// Manifests without a non-empty `name` are skipped. Duplicates are kept.
    fn get_packages(&self, root: &Path) -> Vec<PackageInfo>;
}
