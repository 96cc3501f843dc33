pub mod detect_cmd;
pub mod report_cmd;

pub mod core;
pub mod detect;
pub mod report;

use std::path::PathBuf;
use thiserror::Error;

pub use crate::core::{MonorepoType, PackageInfo, RunMetadata, TypeScriptError};
pub use crate::detect::{Detection, Detector, DetectorRegistry};
pub use crate::report::{OutputMaterializer, TsvExporter, generate_tsv, generate_tsv_with_metadata};

#[derive(Debug, Error)]
pub enum TypelenseError {
    #[error("{0}")]
    Message(String),
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl TypelenseError {
    /// Wrap an I/O error with the operation and path it failed on.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TypelenseError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type TypelenseResult<T> = Result<T, TypelenseError>;
