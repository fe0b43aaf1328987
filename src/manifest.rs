//! Project manifests carrying the version number
//!
//! | Type   | File             | Field                     |
//! |--------|------------------|---------------------------|
//! | node   | `package.json`   | `"version": "x.y.z"`      |
//! | python | `pyproject.toml` | `version = "x.y.z"`       |
//! | go     | `Taskfile.sh`    | `VERSION="x.y.z"`         |

use crate::domain::SemanticVersion;
use crate::error::{ReleaseError, Result};
use regex::{Captures, Regex};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

static NODE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"version"\s*:\s*"[^"]*""#).expect("node version regex is valid")
});

static PYTHON_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)^(?P<lead>[ \t]*)version\s*=\s*"[^"]*""#)
        .expect("python version regex is valid")
});

static GO_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)^(?P<lead>[ \t]*(?:export[ \t]+)?)VERSION="[^"]*""#)
        .expect("go version regex is valid")
});

/// Kind of project whose manifest gets the new version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Node,
    Python,
    Go,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Node => "node",
            ProjectType::Python => "python",
            ProjectType::Go => "go",
        }
    }

    /// Manifest file name, relative to the repository root
    pub fn manifest_file(&self) -> &'static str {
        match self {
            ProjectType::Node => "package.json",
            ProjectType::Python => "pyproject.toml",
            ProjectType::Go => "Taskfile.sh",
        }
    }

    fn field(&self) -> &'static Regex {
        match self {
            ProjectType::Node => &NODE_VERSION,
            ProjectType::Python => &PYTHON_VERSION,
            ProjectType::Go => &GO_VERSION,
        }
    }

    fn replacement(&self, caps: &Captures<'_>, version: &str) -> String {
        let lead = caps.name("lead").map(|m| m.as_str()).unwrap_or_default();
        match self {
            ProjectType::Node => format!(r#""version": "{}""#, version),
            ProjectType::Python => format!(r#"{}version = "{}""#, lead, version),
            ProjectType::Go => format!(r#"{}VERSION="{}""#, lead, version),
        }
    }

    /// Replace the first version field in `text`.
    ///
    /// # Returns
    /// * `Ok(String)` - Text with the field rewritten
    /// * `Err(ReleaseError::Manifest)` - If the text has no version field
    pub fn patch_text(&self, text: &str, version: &SemanticVersion) -> Result<String> {
        let version = version.to_string();
        let field = self.field();
        if !field.is_match(text) {
            return Err(ReleaseError::manifest(format!(
                "No version field found in {}",
                self.manifest_file()
            )));
        }
        Ok(field
            .replacen(text, 1, |caps: &Captures<'_>| self.replacement(caps, &version))
            .into_owned())
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "node" => Ok(ProjectType::Node),
            "python" => Ok(ProjectType::Python),
            "go" => Ok(ProjectType::Go),
            _ => Err(ReleaseError::UnsupportedProjectType(s.to_string())),
        }
    }
}

/// A manifest file found on disk
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub project_type: ProjectType,
    pub path: PathBuf,
}

impl Manifest {
    /// Find the manifest of `project_type` under the repository root
    pub fn locate(root: &Path, project_type: ProjectType) -> Result<Self> {
        let path = root.join(project_type.manifest_file());
        if !path.is_file() {
            return Err(ReleaseError::manifest(format!(
                "Cannot find {} for {} project at '{}'",
                project_type.manifest_file(),
                project_type,
                path.display()
            )));
        }
        Ok(Manifest { project_type, path })
    }

    /// Rewrite the version field in place
    pub fn patch(&self, version: &SemanticVersion) -> Result<()> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            ReleaseError::manifest(format!("Cannot read '{}': {}", self.path.display(), e))
        })?;
        let patched = self.project_type.patch_text(&text, version)?;
        fs::write(&self.path, patched).map_err(|e| {
            ReleaseError::manifest(format!("Cannot write '{}': {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), %version, "manifest patched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> SemanticVersion {
        SemanticVersion::parse(text).unwrap()
    }

    #[test]
    fn test_project_type_from_str() {
        assert_eq!("node".parse::<ProjectType>().unwrap(), ProjectType::Node);
        assert_eq!("Python".parse::<ProjectType>().unwrap(), ProjectType::Python);
        assert_eq!("go".parse::<ProjectType>().unwrap(), ProjectType::Go);
        assert!(matches!(
            "rust".parse::<ProjectType>(),
            Err(ReleaseError::UnsupportedProjectType(t)) if t == "rust"
        ));
    }

    #[test]
    fn test_patch_node_first_match_only() {
        let text = r#"{
  "name": "app",
  "version": "0.1.0",
  "dependencies": { "x": { "version": "9.9.9" } }
}
"#;
        let patched = ProjectType::Node.patch_text(text, &v("1.2.0")).unwrap();
        assert!(patched.contains(r#""version": "1.2.0","#));
        assert!(patched.contains(r#""version": "9.9.9""#));
    }

    #[test]
    fn test_patch_node_compact_spacing() {
        let patched = ProjectType::Node
            .patch_text(r#"{"version":"0.0.1"}"#, &v("v0.0.2"))
            .unwrap();
        assert_eq!(patched, r#"{"version": "0.0.2"}"#);
    }

    #[test]
    fn test_patch_python_keeps_indentation() {
        let text = "[project]\nname = \"app\"\n  version = \"0.1.0\"\n\n[tool.x]\nversion = \"5\"\n";
        let patched = ProjectType::Python.patch_text(text, &v("0.2.0")).unwrap();
        assert_eq!(
            patched,
            "[project]\nname = \"app\"\n  version = \"0.2.0\"\n\n[tool.x]\nversion = \"5\"\n"
        );
    }

    #[test]
    fn test_patch_python_ignores_prefixed_keys() {
        let text = "target_version = \"3\"\nversion = \"1.0.0\"\n";
        let patched = ProjectType::Python.patch_text(text, &v("1.0.1")).unwrap();
        assert_eq!(patched, "target_version = \"3\"\nversion = \"1.0.1\"\n");
    }

    #[test]
    fn test_patch_go_taskfile() {
        let text = "#!/bin/bash\nexport VERSION=\"1.0.0\"\necho $VERSION\n";
        let patched = ProjectType::Go.patch_text(text, &v("1.1.0")).unwrap();
        assert_eq!(patched, "#!/bin/bash\nexport VERSION=\"1.1.0\"\necho $VERSION\n");
    }

    #[test]
    fn test_patch_without_field_fails() {
        let err = ProjectType::Node
            .patch_text(r#"{"name": "app"}"#, &v("1.0.0"))
            .unwrap_err();
        assert!(matches!(err, ReleaseError::Manifest(_)));
    }

    #[test]
    fn test_locate_and_patch_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Manifest::locate(dir.path(), ProjectType::Python).is_err());

        fs::write(dir.path().join("pyproject.toml"), "version = \"0.1.0\"\n").unwrap();
        let manifest = Manifest::locate(dir.path(), ProjectType::Python).unwrap();
        manifest.patch(&v("0.2.0")).unwrap();

        let text = fs::read_to_string(dir.path().join("pyproject.toml")).unwrap();
        assert_eq!(text, "version = \"0.2.0\"\n");
    }
}
