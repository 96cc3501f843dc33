//! Minimal views of the JSON configuration files detectors read.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// The fields of a `package.json` that detection cares about.
#[derive(Debug, Default, Deserialize)]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub workspaces: Option<Workspaces>,
}

/// The `workspaces` field: either a bare array of globs or `{ "packages": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    TopLevel(Vec<String>),
    Nested {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl AsRef<[String]> for Workspaces {
    fn as_ref(&self) -> &[String] {
        match self {
            Workspaces::TopLevel(packages) => packages.as_slice(),
            Workspaces::Nested { packages } => packages.as_slice(),
        }
    }
}

impl From<Workspaces> for Vec<String> {
    fn from(value: Workspaces) -> Self {
        match value {
            Workspaces::TopLevel(packages) => packages,
            Workspaces::Nested { packages } => packages,
        }
    }
}

impl PackageJson {
    /// The package name, if present and non-empty.
    pub fn package_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Read and deserialize a JSON file, returning `None` on any failure.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = fs::read_to_string(path)
        .inspect_err(|e| debug!("unable to read {}: {e}", path.display()))
        .ok()?;
    serde_json::from_str(&contents)
        .inspect_err(|e| debug!("unable to parse {}: {e}", path.display()))
        .ok()
}
