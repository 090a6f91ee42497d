//! Generator configuration loaded from an optional TOML file.
//!
//! ```toml
//! package = "client"
//! file_name = "client.go"
//! strict_refs = false
//! selection_depth = 3
//! formatter = "goimports"
//!
//! [scalars]
//! Time = "date-time"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SdkgenError};
use crate::model::BuiltinScalar;

pub const DEFAULT_FILE_NAME: &str = "client.go";
pub const DEFAULT_FORMATTER: &str = "goimports";

/// Formatter value that disables external formatting.
pub const NO_FORMATTER: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Package name of the generated source.
    pub package: String,
    pub file_name: String,
    /// Fail the run when any `$ref` cannot be resolved.
    pub strict_refs: bool,
    /// How many object levels GraphQL selection sets expand.
    pub selection_depth: usize,
    pub formatter: String,
    /// Extra GraphQL scalar names treated as builtins.
    pub scalars: BTreeMap<String, BuiltinScalar>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package: "client".to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            strict_refs: false,
            selection_depth: 3,
            formatter: DEFAULT_FORMATTER.to_string(),
            scalars: BTreeMap::from([
                ("Time".to_string(), BuiltinScalar::DateTime),
                ("Date".to_string(), BuiltinScalar::Date),
                ("Email".to_string(), BuiltinScalar::String),
            ]),
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| SdkgenError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let config = Self::from_toml(&contents).map_err(|message| SdkgenError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(path = %path.display(), ?config, "Loaded generator config.");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|err| err.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.package.trim().is_empty() {
            return Err("`package` must not be empty".to_string());
        }
        if self.file_name.trim().is_empty() {
            return Err("`file_name` must not be empty".to_string());
        }
        Ok(())
    }

    /// External formatter program, `None` when formatting is disabled.
    pub fn formatter_program(&self) -> Option<&str> {
        let name = self.formatter.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(NO_FORMATTER) {
            None
        } else {
            Some(name)
        }
    }
}
