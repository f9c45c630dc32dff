use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Configuration for a record comparison.
///
/// The service list location and its designated fields are fixed per record
/// format; they are configuration, not something discovered from the data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Path from the record root to the repeated service list.
    pub service_list_path: Vec<String>,
    /// Fields that must all be present and equal for two services to match.
    pub service_fields: Vec<String>,
    /// When `false`, the sample's service list is diffed in stored order.
    pub align_services: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            service_list_path: vec!["Z_SL".into(), "SL".into(), "USL".into()],
            service_fields: vec!["DATE_IN".into(), "CODE_USL".into()],
            align_services: true,
        }
    }
}

impl DiffConfig {
    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        toml::from_str(s).map_err(|e| DiffError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: &Path) -> DiffResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DiffError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Configuration that skips service alignment.
    pub fn unaligned() -> Self {
        Self {
            align_services: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = DiffConfig::default();
        assert_eq!(c.service_list_path, ["Z_SL", "SL", "USL"]);
        assert_eq!(c.service_fields, ["DATE_IN", "CODE_USL"]);
        assert!(c.align_services);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = DiffConfig::from_toml_str(r#"service_fields = ["IDSERV"]"#).unwrap();
        assert_eq!(c.service_fields, ["IDSERV"]);
        assert_eq!(c.service_list_path, ["Z_SL", "SL", "USL"]);
        assert!(c.align_services);
    }

    #[test]
    fn invalid_toml_rejected() {
        let err = DiffConfig::from_toml_str("service_fields = 3").unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    #[test]
    fn missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = DiffConfig::from_toml_file(&dir.path().join("none.toml")).unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = DiffConfig::unaligned();
        let text = toml::to_string(&c).unwrap();
        assert_eq!(DiffConfig::from_toml_str(&text).unwrap(), c);
    }
}
