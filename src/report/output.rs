//! Timestamped report directories.
//!
//! Every invocation writes into a fresh `<base>/.typelense/<YYYY-MM-DD>-<HH-MM-SS>`
//! directory containing `errors.tsv`, `metadata.json` and, for web output,
//! the template tree plus a self-contained `index.html`. Two runs within the
//! same wall-clock second share a directory name.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, info, warn};

use super::html::generate_single_file_html;
use super::templates::{TemplateSource, copy_templates};
use super::tsv::TsvExporter;
use crate::core::TypeScriptError;
use crate::{TypelenseError, TypelenseResult};

/// Folder under the base directory that holds all runs.
pub const OUTPUT_ROOT: &str = ".typelense";
pub const ERRORS_FILE: &str = "errors.tsv";
pub const METADATA_FILE: &str = "metadata.json";

/// Current local time, falling back to UTC when the offset is unknown.
fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Directory name for a run started at `at`, e.g. `2026-01-15-09-04-05`.
pub fn run_dir_name(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day]-[hour]-[minute]-[second]");
    at.format(&format).unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// Writes report directories.
#[derive(Debug, Clone, Default)]
pub struct OutputMaterializer {
    templates: TemplateSource,
}

impl OutputMaterializer {
    pub fn new() -> Self {
        OutputMaterializer::default()
    }

    /// Use an explicit template directory instead of searching for one.
    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates = TemplateSource::Dir(dir.into());
        self
    }

    pub fn with_template_source(mut self, templates: TemplateSource) -> Self {
        self.templates = templates;
        self
    }

    /// Output directory for a run started at `at`.
    pub fn output_dir_at(base_dir: &Path, at: OffsetDateTime) -> PathBuf {
        base_dir.join(OUTPUT_ROOT).join(run_dir_name(at))
    }

    /// Write a report for a run started now. See [`Self::write_at`].
    pub fn write<M: Serialize + ?Sized>(
        &self,
        errors: &[TypeScriptError],
        metadata: &M,
        base_dir: &Path,
        web: bool,
    ) -> TypelenseResult<PathBuf> {
        self.write_at(errors, metadata, base_dir, web, now())
    }

    /// Write a report for a run started at `at` and return its directory.
    ///
    /// Template copying and HTML generation are best-effort. Creating the
    /// directory or writing `errors.tsv`/`metadata.json` is not; a failure
    /// there may leave the directory partially populated.
    ///
    /// # Errors
    /// Returns an error if the directory, TSV or metadata cannot be written.
    pub fn write_at<M: Serialize + ?Sized>(
        &self,
        errors: &[TypeScriptError],
        metadata: &M,
        base_dir: &Path,
        web: bool,
        at: OffsetDateTime,
    ) -> TypelenseResult<PathBuf> {
        let output_dir = Self::output_dir_at(base_dir, at);
        fs::create_dir_all(&output_dir)
            .map_err(|e| TypelenseError::io("failed to create directory", &output_dir, e))?;

        if web {
            self.copy_templates(&output_dir);
        }

        TsvExporter::new().export(errors, &output_dir.join(ERRORS_FILE))?;

        let metadata_path = output_dir.join(METADATA_FILE);
        let metadata_json = serde_json::to_string_pretty(metadata)?;
        fs::write(&metadata_path, metadata_json)
            .map_err(|e| TypelenseError::io("failed to write", &metadata_path, e))?;

        if web {
            generate_single_file_html(errors, &self.templates, &output_dir);
        }

        info!(
            "wrote {} error(s) to {}",
            errors.len(),
            output_dir.display()
        );
        Ok(output_dir)
    }

    fn copy_templates(&self, output_dir: &Path) {
        let Some(templates_dir) = self.templates.resolve() else {
            debug!("no templates directory found, skipping template copy");
            return;
        };
        if let Err(e) = copy_templates(&templates_dir, output_dir) {
            warn!(
                "failed to copy templates from {}: {e}",
                templates_dir.display()
            );
        }
    }
}

/// Write `errors.tsv` and `metadata.json` (and, with `web`, the HTML report)
/// into a fresh timestamped directory under `base_dir/.typelense`.
pub fn generate_tsv_with_metadata<M: Serialize + ?Sized>(
    errors: &[TypeScriptError],
    metadata: &M,
    base_dir: &Path,
    web: bool,
) -> TypelenseResult<PathBuf> {
    OutputMaterializer::new().write(errors, metadata, base_dir, web)
}
