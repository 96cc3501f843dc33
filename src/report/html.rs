//! Single-file HTML report built from the bundled web templates.
//!
//! The template is a prebuilt web app: `index.html` plus an `assets/`
//! directory holding one stylesheet and two ES module bundles (a shared
//! "vendor" chunk and the application entry chunk). Producing a portable
//! report means rewriting that HTML so it references nothing on disk:
//! - the stylesheet link becomes an inline `<style>` block
//! - both bundles are merged into one classic inline `<script>`, with the
//!   entry's imports rebound to the vendor's local names
//! - the TSV data is embedded into the `window.__TS_ERROR_DATA__` placeholder
//!
//! The bundle merge only understands a single flat `export{a as b,...}`
//! clause at the end of the vendor chunk and a single flat
//! `import{a as b,...}from"..."` clause in the entry chunk. Any other shape
//! leaves the original `<script src>` tag in place.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::{debug, info, warn};

use super::templates::TemplateSource;
use super::tsv::TsvExporter;
use crate::core::TypeScriptError;
use crate::{TypelenseError, TypelenseResult};

/// Placeholder assignment in `index.html` that receives the TSV data.
pub const DATA_PLACEHOLDER: &str = "window.__TS_ERROR_DATA__ = ``;";

static STYLESHEET_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<link rel="stylesheet"[^>]+>"#).expect("valid regex"));
static VENDOR_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"export\{([^}]+)\};?\s*$").expect("valid regex"));
static ENTRY_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import\{([^}]+)\}from"[^"]+";?"#).expect("valid regex"));
static MODULE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script type="module" crossorigin src="[^"]+"></script>"#).expect("valid regex")
});
static MODULE_PRELOAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<link rel="modulepreload"[^>]+>"#).expect("valid regex"));

/// Raw template files read from a template directory.
#[derive(Debug, Clone, Default)]
pub struct TemplateAssets {
    pub index_html: String,
    pub css: Option<String>,
    /// Bundle whose file name contains "vendor"
    pub vendor_js: Option<String>,
    /// First bundle whose file name does not contain "vendor"
    pub entry_js: Option<String>,
}

impl TemplateAssets {
    /// Read `index.html` and the stylesheet and bundles under `assets/`.
    ///
    /// Asset files are considered in file name order. A missing `assets/`
    /// directory yields no assets.
    pub fn load(templates_dir: &Path) -> TypelenseResult<Self> {
        let html_path = templates_dir.join("index.html");
        let index_html = fs::read_to_string(&html_path)
            .map_err(|e| TypelenseError::io("failed to read", &html_path, e))?;

        let mut assets = TemplateAssets {
            index_html,
            ..Default::default()
        };

        let assets_dir = templates_dir.join("assets");
        if !assets_dir.is_dir() {
            debug!("no assets directory in {}", templates_dir.display());
            return Ok(assets);
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&assets_dir)
            .map_err(|e| TypelenseError::io("failed to list", &assets_dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        let read = |path: &Path| {
            fs::read_to_string(path).map_err(|e| TypelenseError::io("failed to read", path, e))
        };

        for path in files.iter().map(PathBuf::as_path) {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.ends_with(".css") {
                if assets.css.is_none() {
                    assets.css = Some(read(path)?);
                }
            } else if name.ends_with(".js") {
                if name.contains("vendor") {
                    if assets.vendor_js.is_none() {
                        assets.vendor_js = Some(read(path)?);
                    }
                } else if assets.entry_js.is_none() {
                    assets.entry_js = Some(read(path)?);
                }
            }
        }

        Ok(assets)
    }
}

/// Replace the first stylesheet link with an inline `<style>` block.
pub fn inline_css(html: &str, css: &str) -> String {
    let style = format!("<style>{css}</style>");
    STYLESHEET_LINK.replacen(html, 1, NoExpand(&style)).into_owned()
}

/// Split a flat `a as b, c` clause into `(left, right)` name pairs.
fn parse_clause(clause: &str) -> impl Iterator<Item = (&str, &str)> {
    clause
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once(" as ") {
            Some((left, right)) => (left.trim(), right.trim()),
            None => (item, item),
        })
}

/// Merge a vendor bundle and an entry bundle into one classic script body.
///
/// Returns `None` if either bundle lacks the expected flat export/import
/// clause.
pub fn merge_bundles(vendor: &str, entry: &str) -> Option<String> {
    let export = VENDOR_EXPORT.captures(vendor)?;
    let import = ENTRY_IMPORT.captures(entry)?;

    // exported name -> vendor local
    let exports: HashMap<&str, &str> = parse_clause(export.get(1)?.as_str())
        .map(|(local, exported)| (exported, local))
        .collect();

    let bindings: Vec<String> = parse_clause(import.get(1)?.as_str())
        .filter_map(|(imported, alias)| {
            let local = exports.get(imported)?;
            // Same name on both sides is already in scope.
            (*local != alias).then(|| format!("const {alias} = {local};"))
        })
        .collect();

    let export_clause = export.get(0)?;
    let import_clause = import.get(0)?;
    let vendor_body = &vendor[..export_clause.start()];
    let entry_body = format!(
        "{}{}",
        &entry[..import_clause.start()],
        &entry[import_clause.end()..]
    );

    Some(format!(
        "\n// Vendor\n{vendor_body}\n// Mappings\n{}\n// Index\n{entry_body}\n",
        bindings.join("\n")
    ))
}

/// Replace the module script tag with `script` inline and drop modulepreload links.
pub fn inline_script(html: &str, script: &str) -> String {
    let tag = format!("<script>{script}</script>");
    let html = MODULE_SCRIPT.replacen(html, 1, NoExpand(&tag));
    MODULE_PRELOAD.replace_all(&html, "").into_owned()
}

/// Escape text for embedding inside a JavaScript template literal.
pub fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace('$', "\\$")
}

/// Substitute the TSV data into the data placeholder, if present.
pub fn inject_error_data(html: &str, tsv: &str) -> String {
    let assignment = format!(
        "window.__TS_ERROR_DATA__ = `{}`;",
        escape_template_literal(tsv)
    );
    html.replacen(DATA_PLACEHOLDER, &assignment, 1)
}

/// Rewrite the template HTML into a self-contained report.
pub fn render_single_file_html(assets: &TemplateAssets, tsv: &str) -> String {
    let mut html = assets.index_html.clone();

    if let Some(css) = &assets.css {
        html = inline_css(&html, css);
    }

    match (&assets.vendor_js, &assets.entry_js) {
        (Some(vendor), Some(entry)) => match merge_bundles(vendor, entry) {
            Some(script) => html = inline_script(&html, &script),
            None => warn!("unrecognized bundle export/import shape, scripts left external"),
        },
        _ => debug!("template has no vendor/entry bundle pair, scripts left as-is"),
    }

    inject_error_data(&html, tsv)
}

/// Build `index.html` in `output_dir` from the templates in `templates_dir`.
///
/// # Errors
/// Returns an error if a template file cannot be read or the report cannot be written.
pub fn write_single_file_html(
    errors: &[TypeScriptError],
    templates_dir: &Path,
    output_dir: &Path,
) -> TypelenseResult<PathBuf> {
    let assets = TemplateAssets::load(templates_dir)?;
    let tsv = TsvExporter::new().render(errors)?;
    let html = render_single_file_html(&assets, &tsv);

    let output = output_dir.join("index.html");
    fs::write(&output, html).map_err(|e| TypelenseError::io("failed to write", &output, e))?;
    Ok(output)
}

/// Best-effort single-file HTML generation.
///
/// Returns the written file, or `None` when no templates are available or
/// generation failed (failures are logged, never returned).
pub fn generate_single_file_html(
    errors: &[TypeScriptError],
    templates: &TemplateSource,
    output_dir: &Path,
) -> Option<PathBuf> {
    let Some(templates_dir) = templates.resolve() else {
        debug!("no templates directory found, skipping HTML report");
        return None;
    };

    match write_single_file_html(errors, &templates_dir, output_dir) {
        Ok(path) => {
            info!("wrote HTML report to {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("failed to generate inlined HTML: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head>
<script type="module" crossorigin src="/assets/index-a1.js"></script>
<link rel="modulepreload" crossorigin href="/assets/vendor-b2.js">
<link rel="stylesheet" crossorigin href="/assets/index-c3.css">
</head>
<body><div id="root"></div><script>window.__TS_ERROR_DATA__ = ``;</script></body>
</html>"#;

    #[test]
    fn test_inline_css() {
        let html = inline_css(INDEX_HTML, "body{color:red}");
        assert!(html.contains("<style>body{color:red}</style>"));
        assert!(!html.contains("rel=\"stylesheet\""));
    }

    #[test]
    fn test_inline_css_is_literal() {
        let html = inline_css(INDEX_HTML, ".a::after{content:'$1 ${x}'}");
        assert!(html.contains("<style>.a::after{content:'$1 ${x}'}</style>"));
    }

    #[test]
    fn test_merge_binds_imports_to_vendor_locals() {
        let vendor = "function x(){return 1}var q=2;export{x as y,q as r};";
        let entry = r#"import{y as z,r}from"./vendor-b2.js";console.log(z(),r);"#;

        let merged = merge_bundles(vendor, entry).unwrap();
        assert!(merged.contains("const z = x;"));
        assert!(merged.contains("const r = q;"));
        assert!(merged.contains("function x(){return 1}var q=2;"));
        assert!(merged.contains("console.log(z(),r);"));
        assert!(!merged.contains("export{"));
        assert!(!merged.contains("import{"));

        let vendor_at = merged.find("function x").unwrap();
        let binding_at = merged.find("const z").unwrap();
        let entry_at = merged.find("console.log").unwrap();
        assert!(vendor_at < binding_at && binding_at < entry_at);
    }

    #[test]
    fn test_merge_skips_unknown_and_identity_imports() {
        let vendor = "var a=1;export{a};\n";
        let entry = r#"import{a,missing as m}from"./vendor.js";a;"#;

        let merged = merge_bundles(vendor, entry).unwrap();
        assert!(!merged.contains("const a = a;"));
        assert!(!merged.contains("const m"));
        assert!(merged.contains("var a=1;"));
    }

    #[test]
    fn test_merge_rejects_other_shapes() {
        assert!(merge_bundles("export default 1;", r#"import{a}from"./v.js";"#).is_none());
        assert!(merge_bundles("var a;export{a};", "import * as v from './v.js';").is_none());
    }

    #[test]
    fn test_inline_script_drops_preloads() {
        let html = inline_script(INDEX_HTML, "var $1 = 2;");
        assert!(html.contains("<script>var $1 = 2;</script>"));
        assert!(!html.contains("src=\"/assets/index-a1.js\""));
        assert!(!html.contains("modulepreload"));
    }

    #[test]
    fn test_escape_template_literal() {
        assert_eq!(escape_template_literal("a`b${c}"), "a\\`b\\${c}");
        assert_eq!(escape_template_literal(r"C:\src"), r"C:\\src");
    }

    #[test]
    fn test_inject_error_data() {
        let html = inject_error_data(INDEX_HTML, "id\tname\n1\t`x`");
        assert!(html.contains("window.__TS_ERROR_DATA__ = `id\tname\n1\t\\`x\\``;"));
        assert!(!html.contains(DATA_PLACEHOLDER));
    }

    #[test]
    fn test_render_degrades_without_merge() {
        let assets = TemplateAssets {
            index_html: INDEX_HTML.to_string(),
            css: Some("p{}".to_string()),
            vendor_js: Some("export default {}".to_string()),
            entry_js: Some("console.log(1)".to_string()),
        };
        let html = render_single_file_html(&assets, "id");
        assert!(html.contains("<style>p{}</style>"));
        assert!(html.contains(r#"<script type="module" crossorigin src="/assets/index-a1.js"></script>"#));
        assert!(html.contains("window.__TS_ERROR_DATA__ = `id`;"));
    }

    #[test]
    fn test_load_assets_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
        fs::write(dir.path().join("assets/index-c3.css"), "p{}").unwrap();
        fs::write(dir.path().join("assets/vendor-b2.js"), "vendor").unwrap();
        fs::write(dir.path().join("assets/index-a1.js"), "entry").unwrap();
        fs::write(dir.path().join("assets/logo.svg"), "<svg/>").unwrap();

        let assets = TemplateAssets::load(dir.path()).unwrap();
        assert_eq!(assets.css.as_deref(), Some("p{}"));
        assert_eq!(assets.vendor_js.as_deref(), Some("vendor"));
        assert_eq!(assets.entry_js.as_deref(), Some("entry"));
    }

    #[test]
    fn test_missing_templates_are_not_an_error() {
        let out = tempfile::tempdir().unwrap();
        let source = TemplateSource::Dir(out.path().join("nope"));
        assert!(generate_single_file_html(&[], &source, out.path()).is_none());
        assert!(!out.path().join("index.html").exists());
    }

    #[test]
    fn test_missing_index_html_is_swallowed() {
        let templates = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let source = TemplateSource::Dir(templates.path().to_path_buf());
        assert!(generate_single_file_html(&[], &source, out.path()).is_none());
    }
}
