//! YAML preset loading and deep merging.
//!
//! A preset is a YAML mapping whose top-level keys mirror the `generate`
//! options. Unknown keys are dropped with a warning. Command-line values are
//! merged over the preset, nested mappings merged key by key.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};

/// Environment variable naming a default preset file.
pub const CONFIG_ENV: &str = "CHORDLOOM_CONFIG";

/// Top-level keys a preset may set.
pub const ALLOWED_KEYS: [&str; 19] = [
    "key", "mode", "bpm", "anchor", "groove", "quantize", "humanize", "length", "marker", "drums",
    "motif", "arrange", "voicelead", "midi", "wav", "stems", "out_dir", "name", "render",
];

/// Picks the preset path: an explicit path wins over the environment value.
pub fn resolve_config_path(explicit: Option<&Path>, env_value: Option<OsString>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
}

/// Loads the preset at `path`, or the one named by [`CONFIG_ENV`].
///
/// Returns an empty mapping when neither is given.
pub fn load_config(path: Option<&Path>) -> Result<Mapping> {
    match resolve_config_path(path, std::env::var_os(CONFIG_ENV)) {
        Some(p) => load_config_file(&p),
        None => Ok(Mapping::new()),
    }
}

/// Reads and filters one preset file.
pub fn load_config_file(path: &Path) -> Result<Mapping> {
    if !path.exists() {
        bail!("config not found: {}", path.display());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let value: Value = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;

    let mapping = match value {
        Value::Null => Mapping::new(),
        Value::Mapping(m) => m,
        _ => bail!("config {} must be a YAML mapping", path.display()),
    };
    tracing::info!(path = %path.display(), keys = mapping.len(), "loaded config");
    Ok(retain_allowed(mapping))
}

/// Drops keys not in [`ALLOWED_KEYS`].
pub fn retain_allowed(mapping: Mapping) -> Mapping {
    mapping
        .into_iter()
        .filter(|(k, _)| {
            let allowed = k.as_str().is_some_and(|k| ALLOWED_KEYS.contains(&k));
            if !allowed {
                tracing::warn!(key = ?k, "ignoring unknown config key");
            }
            allowed
        })
        .collect()
}

/// Merges `over` onto `base`; values in `over` win.
///
/// Mappings present on both sides are merged recursively. Every other value,
/// sequences included, is replaced wholesale.
pub fn deep_merge(base: &Mapping, over: &Mapping) -> Mapping {
    let mut out = base.clone();
    for (k, v) in over {
        let merged = match (out.get(k), v) {
            (Some(Value::Mapping(a)), Value::Mapping(b)) => Value::Mapping(deep_merge(a, b)),
            _ => v.clone(),
        };
        out.insert(k.clone(), merged);
    }
    out
}
