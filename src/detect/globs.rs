//! Workspace glob resolution shared by all detectors.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};

use super::manifest::{PackageJson, read_json};
use crate::core::PackageInfo;

const MANIFEST: &str = "package.json";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Make `root` absolute without touching the filesystem.
pub(crate) fn absolute_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}

/// Strip `./` prefixes and trailing slashes so patterns join cleanly.
fn normalize_pattern(pattern: &str) -> &str {
    let mut p = pattern.trim();
    while let Some(rest) = p.strip_prefix("./") {
        p = rest;
    }
    p.trim_end_matches('/')
}

/// Expand `{a,b}` alternations into separate patterns.
///
/// Braces nest (`{a,b{c,d}}`). An unmatched `{` is left as literal text.
pub(crate) fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close)) = find_brace_group(pattern) else {
        return vec![pattern.to_string()];
    };
    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    split_alternatives(&pattern[open + 1..close])
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{prefix}{alt}{suffix}")))
        .collect()
}

/// Byte offsets of the first balanced top-level `{...}` group.
fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
    let open = pattern.find('{')?;
    let mut depth = 0usize;
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((open, open + i));
                }
            }
            _ => {}
        }
    }
    None
}

/// Split the inside of a brace group on commas outside nested groups.
fn split_alternatives(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}

/// Resolve workspace globs against `root` into package descriptors.
///
/// Each pattern is joined with `package.json` and expanded relative to `root`.
/// Brace alternations expand into one pattern each, in written order.
/// Patterns prefixed with `!` exclude package directories matching them.
/// Wildcards do not match dot-directories, and manifests below
/// `node_modules` are never considered.
pub fn resolve_packages<S: AsRef<str>>(root: &Path, patterns: &[S]) -> Vec<PackageInfo> {
    let root = absolute_root(root);
    let escaped_root = Pattern::escape(&root.to_string_lossy());

    let mut includes: Vec<String> = Vec::new();
    let mut excludes: Vec<Pattern> = Vec::new();
    for raw in patterns {
        let raw = raw.as_ref().trim();
        if let Some(negated) = raw.strip_prefix('!') {
            for expanded in expand_braces(normalize_pattern(negated)) {
                match Pattern::new(&expanded) {
                    Ok(p) => excludes.push(p),
                    Err(e) => warn!("ignoring invalid exclusion pattern {raw:?}: {e}"),
                }
            }
        } else if !raw.is_empty() {
            includes.extend(
                expand_braces(raw)
                    .iter()
                    .map(|p| normalize_pattern(p).to_string()),
            );
        }
    }

    let mut packages = Vec::new();
    for pattern in &includes {
        let full = if pattern.is_empty() || pattern == "." {
            format!("{}/{MANIFEST}", escaped_root.trim_end_matches('/'))
        } else {
            format!("{}/{pattern}/{MANIFEST}", escaped_root.trim_end_matches('/'))
        };

        let entries = match glob::glob_with(&full, MATCH_OPTIONS) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("ignoring invalid workspace pattern {pattern:?}: {e}");
                continue;
            }
        };

        for entry in entries {
            let manifest = match entry {
                Ok(path) => path,
                Err(e) => {
                    debug!("skipping unreadable glob match: {e}");
                    continue;
                }
            };
            let Some(package_dir) = manifest.parent() else {
                continue;
            };
            let relative = package_dir.strip_prefix(&root).unwrap_or(package_dir);

            if relative
                .components()
                .any(|c| matches!(c, Component::Normal(s) if s == "node_modules"))
            {
                continue;
            }
            if excludes
                .iter()
                .any(|ex| ex.matches_path_with(relative, MATCH_OPTIONS))
            {
                debug!("excluded {}", relative.display());
                continue;
            }

            if let Some(info) = read_package_info(&manifest) {
                packages.push(info);
            }
        }
    }

    packages
}

/// Read a member manifest. `None` when unreadable or missing a name.
fn read_package_info(manifest: &Path) -> Option<PackageInfo> {
    let pkg: PackageJson = read_json(manifest)?;
    let Some(name) = pkg.package_name() else {
        debug!("skipping {}: no package name", manifest.display());
        return None;
    };
    Some(PackageInfo {
        name: name.to_string(),
        path: manifest.parent()?.to_path_buf(),
        version: pkg.version.clone(),
    })
}
