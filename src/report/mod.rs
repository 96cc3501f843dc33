//! Report generation for collected TypeScript diagnostics.
//!
//! This module provides:
//! - `TsvExporter`: deterministic TSV serialization with field escaping
//! - `OutputMaterializer`: timestamped output directories with TSV and metadata
//! - Single-file HTML rendering from the bundled web templates

pub mod html;
pub mod output;
pub mod templates;
pub mod tsv;

// Re-export key types
pub use html::{generate_single_file_html, render_single_file_html, write_single_file_html};
pub use output::{OutputMaterializer, generate_tsv_with_metadata};
pub use templates::{TemplateSource, copy_templates, locate_templates_dir};
pub use tsv::{TSV_HEADERS, TsvExporter, escape_field, generate_tsv};
