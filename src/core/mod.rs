//! Core types shared by workspace detection and report generation.

pub mod env;
pub mod schema;

// Re-export key types for convenience
pub use env::EnvironmentInfo;
pub use schema::{MonorepoType, PackageInfo, RunMetadata, TypeScriptError};
