//! Config file loading

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use crate::{
    config::{deep_merge, Config},
    error::{ConfigError, Result},
};

/// Tracing target of the loaded/effective config diagnostics
pub const DIAGNOSTICS_TARGET: &str = "canvas_framer::config::diagnostics";

/// Resolve the effective configuration
///
/// The file at `path` is only read when it exists and carries a `.yaml` or
/// `.yml` suffix. In every other case the override is empty and the defaults
/// are used as they are.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    let loaded = read_override(path)?;
    let defaults = Config::default().to_value()?;
    let effective = deep_merge(&loaded, &defaults);

    info!(target: DIAGNOSTICS_TARGET, "Loaded config:\n{}", render(&loaded));
    info!(target: DIAGNOSTICS_TARGET, "Effective config:\n{}", render(&effective));

    Config::from_value(effective)
}

/// Read the override tree from `path`, or an empty mapping if there is none
pub fn read_override(path: &Path) -> Result<Value> {
    if !path.is_file() {
        debug!("No configuration file at {:?}, using defaults", path);
        return Ok(Value::Mapping(Mapping::new()));
    }

    if !has_yaml_suffix(path) {
        warn!("Ignoring {:?}: configuration files must end in .yaml or .yml", path);
        return Ok(Value::Mapping(Mapping::new()));
    }

    let content = fs::read_to_string(path)?;

    let value: Value = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    match value {
        // An empty document
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        Value::Mapping(_) => Ok(value),
        other => Err(ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: format!("top level must be a mapping, found {}", kind(&other)),
        }
        .into()),
    }
}

fn has_yaml_suffix(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn render(value: &Value) -> String {
    serde_yaml::to_string(value).unwrap_or_else(|e| format!("<unprintable: {}>", e))
}
