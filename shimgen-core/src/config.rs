//! Configuration loading from a shim request file.
//!
//! The file is TOML unless its extension is `.json`:
//!
//! ```toml
//! structs = ["io_uring_params", "io_sqring_offsets"]
//! structs_norecurse = ["sockaddr"]
//! defines = ["IORING_SETUP_SQPOLL"]
//! defines_forcehost = ["IORING_OFF_SQ_RING"]
//! defines_target = ["__NR_io_uring_setup"]
//!
//! [output]
//! struct_order = "discovery"
//! declaration_order = "requested-last"
//! no_header = false
//! ```

use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::{IoResultExt, ShimgenError, ShimgenResult};

/// Main configuration structure.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ShimConfig {
    /// Struct names to extract.
    #[serde(default)]
    pub structs: Vec<String>,
    /// Struct names whose references are never chased across the tree.
    #[serde(default)]
    pub structs_norecurse: Vec<String>,
    /// Macro names to extract.
    #[serde(default)]
    pub defines: Vec<String>,
    /// Macro names that always get a `HOST_` shim.
    #[serde(default)]
    pub defines_forcehost: Vec<String>,
    /// Macro names redefined under a `TARGET_` prefix.
    #[serde(default)]
    pub defines_target: Vec<String>,
    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Struct body order: "discovery" or "reverse".
    pub struct_order: Option<String>,
    /// Forward declaration order: "requested-last" or "discovery".
    pub declaration_order: Option<String>,
    /// Suppress the provenance banner.
    pub no_header: Option<bool>,
}

/// Loads a configuration file.
pub fn load_config(path: &Path) -> ShimgenResult<ShimConfig> {
    let content = fs::read_to_string(path).with_path(path)?;
    parse_config(path, &content)
}

/// Parses configuration text, choosing the format from the file extension.
pub fn parse_config(path: &Path, content: &str) -> ShimgenResult<ShimConfig> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(content).map_err(|e| ShimgenError::config(path, e.to_string()))
    } else {
        toml::from_str(content).map_err(|e| ShimgenError::config(path, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_toml() {
        let cfg = parse_config(
            &PathBuf::from("shim.toml"),
            r#"
structs = ["a", "b"]
defines = ["LIMIT"]
defines_target = ["__NR_x"]

[output]
struct_order = "reverse"
"#,
        )
        .unwrap();
        assert_eq!(cfg.structs, vec!["a", "b"]);
        assert_eq!(cfg.defines, vec!["LIMIT"]);
        assert_eq!(cfg.defines_target, vec!["__NR_x"]);
        assert!(cfg.defines_forcehost.is_empty());
        assert_eq!(cfg.output.struct_order.as_deref(), Some("reverse"));
    }

    #[test]
    fn test_parse_json() {
        let cfg = parse_config(
            &PathBuf::from("shim.json"),
            r#"{ "structs": ["a"], "structs_norecurse": ["b"] }"#,
        )
        .unwrap();
        assert_eq!(cfg.structs, vec!["a"]);
        assert_eq!(cfg.structs_norecurse, vec!["b"]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_config(&PathBuf::from("shim.toml"), "struct = [\"a\"]\n").unwrap_err();
        assert!(matches!(err, ShimgenError::Config { .. }));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = parse_config(&PathBuf::from("shim.toml"), "structs = \"a\"\n").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(&PathBuf::from("/nonexistent/shimgen/shim.toml")).unwrap_err();
        assert!(matches!(err, ShimgenError::Io { .. }));
    }
}
