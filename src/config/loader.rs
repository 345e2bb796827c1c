//! Configuration discovery and loading
//!
//! Search order:
//! 1. `--config` flag
//! 2. `PORTSIDE_CONFIG` environment variable
//! 3. `.portside.yml` in the working directory
//! 4. `<config dir>/portside/config.yml`
//!
//! An optional override file (`PORTSIDE_OVERRIDE_CONFIG`, falling back to
//! `.portside.override.yml`) is deep-merged on top of the discovered file.
//! Unknown keys are surfaced as non-fatal warnings with a did-you-mean
//! suggestion.

use std::path::{Path, PathBuf};

use serde_yaml_ng::Value;

use crate::config::Config;
use crate::error::{PortsideError, PortsideResult};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// A loaded configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    pub warnings: Vec<ConfigWarning>,
}

/// Locate, parse, and merge the configuration.
pub fn discover(flag: Option<&Path>) -> PortsideResult<LoadedConfig> {
    let mut searched = Vec::new();

    let path = candidate_paths(flag)
        .into_iter()
        .find(|p| {
            searched.push(p.clone());
            p.exists()
        })
        .ok_or(PortsideError::ConfigNotFound { searched })?;

    load_with_override(&path, override_path().as_deref())
}

fn candidate_paths(flag: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(p) = flag {
        candidates.push(p.to_path_buf());
        return candidates;
    }
    if let Ok(p) = std::env::var("PORTSIDE_CONFIG") {
        if !p.is_empty() {
            candidates.push(PathBuf::from(p));
        }
    }
    candidates.push(PathBuf::from(".portside.yml"));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("portside/config.yml"));
    }
    candidates
}

fn override_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("PORTSIDE_OVERRIDE_CONFIG") {
        if !p.is_empty() {
            return Some(PathBuf::from(p));
        }
    }
    let default = PathBuf::from(".portside.override.yml");
    default.exists().then_some(default)
}

/// Load `path`, merging `override_file` on top when present.
pub fn load_with_override(
    path: &Path,
    override_file: Option<&Path>,
) -> PortsideResult<LoadedConfig> {
    let content = std::fs::read_to_string(path)?;
    let mut value: Value =
        serde_yaml_ng::from_str(&content).map_err(|e| PortsideError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if let Some(over) = override_file {
        if over.exists() {
            let over_content = std::fs::read_to_string(over)?;
            let over_value: Value =
                serde_yaml_ng::from_str(&over_content).map_err(|e| PortsideError::InvalidConfig {
                    file: over.to_path_buf(),
                    message: e.to_string(),
                })?;
            value = merge_values(value, over_value);
        }
    }

    let mut unknown_paths: Vec<String> = Vec::new();
    let config: Config = serde_ignored::deserialize(value, |ignored| {
        unknown_paths.push(ignored.to_string());
    })
    .map_err(|e: serde_yaml_ng::Error| PortsideError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
        warnings,
    })
}

/// Deep-merge two YAML values; `over` wins on conflicts, mappings merge
/// key-by-key.
fn merge_values(base: Value, over: Value) -> Value {
    match (base, over) {
        (Value::Mapping(mut base_map), Value::Mapping(over_map)) => {
            for (key, over_value) in over_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => merge_values(base_value, over_value),
                    None => over_value,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (_, over) => over,
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "project",
        "ssh",
        "host",
        "port",
        "private_key",
        "verbose",
        "skip_agent",
        "rsync_args",
        "api",
        "endpoint",
        "ssh_portal",
        "syncers",
        "type",
        "config",
        "local",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] = std::cmp::min(
                std::cmp::min(curr[j] + 1, prev[j + 1] + 1),
                prev[j] + cost,
            );
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_bytes.len()]
}
