//! Configuration loading and environment parsing.

use super::Config;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load configuration with the following precedence (highest first):
/// 1) `PORT` / `STATIC_DIR` environment variables
/// 2) File pointed to by the `KALAKOBANA_CONFIG_PATH` env var
/// 3) `config.json` in the current working directory
/// 4) Defaults compiled into the binary
///
/// Any errors while reading/parsing are printed to stderr and defaults are
/// used; `load()` always returns a `Config`.
#[must_use]
pub fn load() -> Config {
    use std::env;
    use std::path::PathBuf;

    let defaults = Config::default();
    let mut merged =
        serde_json::to_value(&defaults).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

    // Explicit path via env var
    if let Ok(path) = env::var("KALAKOBANA_CONFIG_PATH") {
        merge_file_source(&mut merged, &PathBuf::from(path));
    }

    // config.json in CWD
    merge_file_source(&mut merged, &PathBuf::from("config.json"));

    let mut config = match serde_json::from_value::<Config>(merged) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to deserialize config; using defaults: {e}");
            defaults
        }
    };

    apply_env_overrides(&mut config);

    config
}

/// `PORT` and `STATIC_DIR` win over any file-provided values.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(raw) = std::env::var("PORT") {
        match raw.trim().parse::<u16>() {
            Ok(port) => config.port = port,
            Err(_) => eprintln!("Ignoring invalid PORT value '{raw}'"),
        }
    }
    if let Ok(dir) = std::env::var("STATIC_DIR") {
        let dir = dir.trim();
        if !dir.is_empty() {
            config.static_dir = dir.to_string();
        }
    }
}

fn merge_file_source(target: &mut Value, path: &Path) {
    if path.as_os_str().is_empty() || !path.exists() {
        return;
    }

    match fs::read_to_string(path) {
        Ok(contents) => {
            if contents.trim().is_empty() {
                return;
            }
            match serde_json::from_str(&contents) {
                Ok(value) => merge_values(target, value),
                Err(err) => {
                    eprintln!("Failed to parse config from {}: {}", path.display(), err);
                }
            }
        }
        Err(err) => {
            eprintln!("Failed to read config from {}: {}", path.display(), err);
        }
    }
}

fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target_slot, source_value) => {
            *target_slot = source_value;
        }
    }
}
