//! TSV export for collected TypeScript diagnostics.

use std::io::Write;
use std::path::Path;

use crate::core::TypeScriptError;
use crate::{TypelenseError, TypelenseResult};

/// TSV column headers in deterministic order.
pub const TSV_HEADERS: &[&str] = &["id", "package_name", "file_name", "error_code", "description"];

/// Make a free-text field safe for a single TSV cell.
///
/// Tabs and newlines become a single space; carriage returns are dropped.
pub fn escape_field(field: &str) -> String {
    field.replace(['\t', '\n'], " ").replace('\r', "")
}

/// TSV exporter for TypeScript diagnostics.
///
/// Rows are newline-separated with no trailing newline, one per error in
/// input order. Fields are escaped rather than quoted.
#[derive(Debug, Clone, Default)]
pub struct TsvExporter;

impl TsvExporter {
    /// Create a new TsvExporter.
    pub fn new() -> Self {
        TsvExporter
    }

    /// Render the full TSV document in memory.
    ///
    /// # Errors
    /// Returns an error if the TSV writer fails.
    pub fn render(&self, errors: &[TypeScriptError]) -> TypelenseResult<String> {
        let mut buffer = Vec::new();
        self.export_to_writer(errors, &mut buffer)?;
        // The writer terminates every record; the document format does not.
        if buffer.last() == Some(&b'\n') {
            buffer.pop();
        }
        String::from_utf8(buffer)
            .map_err(|e| TypelenseError::Message(format!("TSV output is not UTF-8: {e}")))
    }

    /// Export errors to a TSV file, creating or overwriting it.
    ///
    /// The content is fully rendered before a single write.
    ///
    /// # Errors
    /// Returns an error if rendering or writing the file fails.
    pub fn export(&self, errors: &[TypeScriptError], output: &Path) -> TypelenseResult<()> {
        let content = self.render(errors)?;
        std::fs::write(output, content).map_err(|e| TypelenseError::io("failed to write", output, e))
    }

    /// Export errors to any writer implementing Write.
    ///
    /// Every row, including the last, is terminated by `\n`.
    ///
    /// # Errors
    /// Returns an error if TSV writing fails.
    pub fn export_to_writer<W: Write>(
        &self,
        errors: &[TypeScriptError],
        writer: W,
    ) -> TypelenseResult<()> {
        let mut tsv_writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        tsv_writer
            .write_record(TSV_HEADERS)
            .map_err(|e| TypelenseError::Message(format!("failed to write TSV headers: {e}")))?;

        for error in errors {
            tsv_writer
                .write_record(self.error_to_row(error))
                .map_err(|e| TypelenseError::Message(format!("failed to write TSV row: {e}")))?;
        }

        tsv_writer
            .flush()
            .map_err(|e| TypelenseError::Message(format!("failed to flush TSV writer: {e}")))?;

        Ok(())
    }

    /// Convert a TypeScriptError to a row of TSV values.
    fn error_to_row(&self, error: &TypeScriptError) -> [String; 5] {
        [
            error.id.to_string(),
            escape_field(&error.package_name),
            escape_field(&error.file_name),
            error.error_code.to_string(),
            escape_field(&error.description),
        ]
    }
}

/// Write `errors` as TSV to `output`.
pub fn generate_tsv(errors: &[TypeScriptError], output: &Path) -> TypelenseResult<()> {
    TsvExporter::new().export(errors, output)
}
