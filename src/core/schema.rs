//! Data model for detected packages, diagnostics and run metadata.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::env::EnvironmentInfo;

/// Monorepo tooling convention. Each variant is owned by exactly one detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MonorepoType {
    Npm,
    Pnpm,
    Lerna,
    Turbo,
}

impl MonorepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonorepoType::Npm => "npm",
            MonorepoType::Pnpm => "pnpm",
            MonorepoType::Lerna => "lerna",
            MonorepoType::Turbo => "turbo",
        }
    }
}

impl fmt::Display for MonorepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workspace member discovered from its `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    /// Absolute path to the package root (the directory holding `package.json`)
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A single diagnostic collected from a TypeScript compiler run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeScriptError {
    pub id: u64,
    pub package_name: String,
    pub file_name: String,
    pub error_code: u32,
    pub description: String,
}

/// Metadata describing a diagnostic run, written verbatim to `metadata.json`.
///
/// Report generation accepts any `Serialize` value; this is the shape the CLI
/// produces. Unknown fields survive a round trip through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    /// RFC 3339 timestamp of the run
    pub timestamp: String,
    pub root_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monorepo_type: Option<MonorepoType>,
    #[serde(default)]
    pub packages: Vec<PackageInfo>,
    pub total_errors: usize,
    pub tool_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentInfo>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RunMetadata {
    /// Create metadata for a run over `root_path`, stamped with the current UTC time.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        RunMetadata {
            timestamp,
            root_path: root_path.into(),
            monorepo_type: None,
            packages: Vec::new(),
            total_errors: 0,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_detection(mut self, kind: MonorepoType, packages: Vec<PackageInfo>) -> Self {
        self.monorepo_type = Some(kind);
        self.packages = packages;
        self
    }

    pub fn with_errors(mut self, errors: &[TypeScriptError]) -> Self {
        self.total_errors = errors.len();
        self
    }

    pub fn with_environment(mut self, env: EnvironmentInfo) -> Self {
        self.environment = Some(env);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monorepo_type_serializes_lowercase() {
        let json = serde_json::to_string(&MonorepoType::Pnpm).unwrap();
        assert_eq!(json, "\"pnpm\"");
        let parsed: MonorepoType = serde_json::from_str("\"turbo\"").unwrap();
        assert_eq!(parsed, MonorepoType::Turbo);
    }

    #[test]
    fn test_monorepo_type_display() {
        assert_eq!(MonorepoType::Turbo.to_string(), "turbo");
        assert_eq!(MonorepoType::Pnpm.to_string(), "pnpm");
    }

    #[test]
    fn test_typescript_error_uses_camel_case() {
        let err = TypeScriptError {
            id: 7,
            package_name: "@acme/ui".to_string(),
            file_name: "src/index.ts".to_string(),
            error_code: 2322,
            description: "Type 'string' is not assignable to type 'number'.".to_string(),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["packageName"], "@acme/ui");
        assert_eq!(value["errorCode"], 2322);

        let back: TypeScriptError = serde_json::from_value(value).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_package_info_skips_missing_version() {
        let pkg = PackageInfo {
            name: "a".to_string(),
            path: PathBuf::from("/repo/packages/a"),
            version: None,
        };
        let value = serde_json::to_value(&pkg).unwrap();
        assert!(value.get("version").is_none());
    }

    #[test]
    fn test_run_metadata_keeps_extra_fields() {
        let input = serde_json::json!({
            "timestamp": "2026-01-15T12:00:00Z",
            "rootPath": "/repo",
            "monorepoType": "lerna",
            "packages": [],
            "totalErrors": 3,
            "toolVersion": "0.1.0",
            "tscVersion": "5.4.5"
        });
        let meta: RunMetadata = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(meta.monorepo_type, Some(MonorepoType::Lerna));
        assert_eq!(meta.extra["tscVersion"], "5.4.5");
        assert_eq!(serde_json::to_value(&meta).unwrap(), input);
    }
}
