//! Locating and copying the bundled web report templates.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;
use walkdir::WalkDir;

use crate::{TypelenseError, TypelenseResult};

/// Name of the template directory searched for.
pub const TEMPLATES_DIR: &str = "templates";

/// How many directories (starting with the search root) are probed.
pub const SEARCH_DEPTH: usize = 3;

/// Environment variable that points directly at a template directory.
pub const TEMPLATES_ENV: &str = "TYPELENSE_TEMPLATES";

/// Where to look for templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    /// `TYPELENSE_TEMPLATES` if set, else walk up from the executable.
    #[default]
    Installed,
    /// An explicit directory, used as-is.
    Dir(PathBuf),
}

impl TemplateSource {
    /// Resolve to an existing template directory, if any.
    pub fn resolve(&self) -> Option<PathBuf> {
        match self {
            TemplateSource::Dir(dir) => dir.is_dir().then(|| dir.clone()),
            TemplateSource::Installed => {
                if let Some(dir) = std::env::var_os(TEMPLATES_ENV).map(PathBuf::from) {
                    if dir.is_dir() {
                        return Some(dir);
                    }
                    debug!("{TEMPLATES_ENV} does not name a directory: {}", dir.display());
                }
                let exe = std::env::current_exe().ok()?;
                locate_templates_dir(exe.parent()?)
            }
        }
    }
}

/// Find a `templates` directory in `start` or up to two of its ancestors.
pub fn locate_templates_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(SEARCH_DEPTH)
        .map(|dir| dir.join(TEMPLATES_DIR))
        .find(|candidate| candidate.is_dir())
}

/// Recursively copy the template tree into `output_dir`.
///
/// Existing files are overwritten; directories are merged.
pub fn copy_templates(templates_dir: &Path, output_dir: &Path) -> TypelenseResult<()> {
    for entry in WalkDir::new(templates_dir).min_depth(1) {
        let entry = entry
            .with_context(|| format!("failed to walk {}", templates_dir.display()))?;
        let relative = entry.path().strip_prefix(templates_dir).with_context(|| {
            format!(
                "{} is outside {}",
                entry.path().display(),
                templates_dir.display()
            )
        })?;
        let target = output_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| TypelenseError::io("failed to create directory", &target, e))?;
        } else {
            fs::copy(entry.path(), &target)
                .map_err(|e| TypelenseError::io("failed to copy template to", &target, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_in_start_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();

        assert_eq!(
            locate_templates_dir(dir.path()),
            Some(dir.path().join("templates"))
        );
    }

    #[test]
    fn test_locate_walks_up_two_levels() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        let start = dir.path().join("target/release");
        fs::create_dir_all(&start).unwrap();

        assert_eq!(
            locate_templates_dir(&start),
            Some(dir.path().join("templates"))
        );
    }

    #[test]
    fn test_locate_gives_up_after_three_levels() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        let start = dir.path().join("a/b/c");
        fs::create_dir_all(&start).unwrap();

        assert_eq!(locate_templates_dir(&start), None);
    }

    #[test]
    fn test_templates_file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("templates"), "").unwrap();
        assert_eq!(locate_templates_dir(dir.path()), None);
    }

    #[test]
    fn test_explicit_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = TemplateSource::Dir(dir.path().to_path_buf());
        assert_eq!(source.resolve(), Some(dir.path().to_path_buf()));

        let missing = TemplateSource::Dir(dir.path().join("missing"));
        assert_eq!(missing.resolve(), None);
    }

    #[test]
    fn test_copy_templates_recursively() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("assets")).unwrap();
        fs::write(src.path().join("index.html"), "<html></html>").unwrap();
        fs::write(src.path().join("assets/index-abc.js"), "console.log(1)").unwrap();

        copy_templates(src.path(), out.path()).unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("index.html")).unwrap(),
            "<html></html>"
        );
        assert!(out.path().join("assets/index-abc.js").is_file());
    }

    #[test]
    fn test_copy_missing_templates_reports_walk_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = copy_templates(&missing, dir.path()).unwrap_err();
        assert!(matches!(err, TypelenseError::Anyhow(_)));
        assert!(err.to_string().starts_with("failed to walk"));
    }
}
