use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::{EnvironmentInfo, MonorepoType, RunMetadata, TypeScriptError};
use crate::detect_cmd::detect;
use crate::report::{OutputMaterializer, TemplateSource};
use crate::{TypelenseError, TypelenseResult};

/// Read a JSON array of diagnostics.
pub fn load_errors(path: &Path) -> TypelenseResult<Vec<TypeScriptError>> {
    let s = std::fs::read_to_string(path).map_err(|e| TypelenseError::io("failed to read", path, e))?;
    serde_json::from_str(&s)
        .map_err(|e| TypelenseError::Message(format!("failed to parse {}: {e}", path.display())))
}

/// Read metadata from a JSON file, passed through unmodified.
fn load_metadata(path: &Path) -> TypelenseResult<serde_json::Value> {
    let s = std::fs::read_to_string(path).map_err(|e| TypelenseError::io("failed to read", path, e))?;
    serde_json::from_str(&s)
        .map_err(|e| TypelenseError::Message(format!("failed to parse {}: {e}", path.display())))
}

/// Build run metadata from detecting `root`.
pub fn collect_metadata(
    root: &Path,
    forced: Option<MonorepoType>,
    errors: &[TypeScriptError],
) -> RunMetadata {
    let mut metadata = RunMetadata::new(root)
        .with_errors(errors)
        .with_environment(EnvironmentInfo::detect(root));
    if let Some(detection) = detect(root, forced) {
        metadata = metadata.with_detection(detection.monorepo_type, detection.packages);
    }
    metadata
}

pub fn run(
    errors_path: PathBuf,
    root: PathBuf,
    out_dir: Option<PathBuf>,
    metadata_path: Option<PathBuf>,
    forced: Option<MonorepoType>,
    web: bool,
    templates: Option<PathBuf>,
) -> TypelenseResult<()> {
    let errors = load_errors(&errors_path)?;
    info!("loaded {} error(s) from {}", errors.len(), errors_path.display());

    let materializer = OutputMaterializer::new().with_template_source(match templates {
        Some(dir) => TemplateSource::Dir(dir),
        None => TemplateSource::Installed,
    });
    let base_dir = out_dir.unwrap_or_else(|| root.clone());

    let output_dir = match metadata_path {
        Some(path) => {
            let metadata = load_metadata(&path)?;
            materializer.write(&errors, &metadata, &base_dir, web)?
        }
        None => {
            let metadata = collect_metadata(&root, forced, &errors);
            materializer.write(&errors, &metadata, &base_dir, web)?
        }
    };

    println!("{}", output_dir.display());
    Ok(())
}
