//! The package manifest (`package.json`) whose `version` field is bumped.

use crate::domain::parse_version;
use crate::error::{PublishError, Result};
use semver::Version;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// A loaded manifest. Field order is preserved on save.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    document: Map<String, Value>,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    ///
    /// # Returns
    /// * `Ok(Manifest)` - The file holds a JSON object
    /// * `Err(PublishError::Manifest)` - The file is unreadable or not a JSON object
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path).map_err(|e| {
            PublishError::manifest(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let document = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(PublishError::manifest(format!(
                    "{} is not a JSON object",
                    path.display()
                )))
            }
            Err(e) => {
                return Err(PublishError::manifest(format!(
                    "{} is not valid JSON: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Manifest { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    pub fn version(&self) -> Result<Version> {
        let raw = self
            .document
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                PublishError::manifest(format!("{} has no version field", self.path.display()))
            })?;
        parse_version(raw)
    }

    pub fn set_version(&mut self, version: &Version) {
        self.document
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Write back with two-space indentation and a trailing newline.
    pub fn save(&self) -> Result<()> {
        let mut text = serde_json::to_string_pretty(&self.document)
            .map_err(|e| PublishError::manifest(e.to_string()))?;
        text.push('\n');
        fs::write(&self.path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn manifest_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_version_roundtrip_preserves_order() {
        let file = manifest_file(
            r#"{"name": "@acme/widgets", "version": "1.2.3", "main": "dist/index.js"}"#,
        );
        let mut manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.name(), Some("@acme/widgets"));
        assert_eq!(manifest.version().unwrap(), Version::new(1, 2, 3));

        manifest.set_version(&Version::parse("1.2.4-rc.0").unwrap());
        manifest.save().unwrap();

        let written = fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            written,
            "{\n  \"name\": \"@acme/widgets\",\n  \"version\": \"1.2.4-rc.0\",\n  \"main\": \"dist/index.js\"\n}\n"
        );
    }

    #[test]
    fn test_missing_version() {
        let file = manifest_file(r#"{"name": "x"}"#);
        let manifest = Manifest::load(file.path()).unwrap();
        assert!(matches!(manifest.version(), Err(PublishError::Manifest(_))));
    }

    #[test]
    fn test_not_an_object() {
        let file = manifest_file("[1, 2]");
        assert!(Manifest::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Manifest::load("/nonexistent/package.json").unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }
}
