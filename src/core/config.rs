//! Game configuration with dotted-path typed getters
//!
//! Tunables live in a JSON document and are read once at startup via
//! `get_*("section.key", default)`. A missing or malformed entry falls back
//! to the caller-supplied default with a warning log - configuration
//! problems are never fatal and never propagate as errors.

use serde_json::Value;

/// Loaded configuration document
#[derive(Debug, Clone)]
pub struct Config {
    doc: Value,
}

impl Config {
    /// Built-in defaults, used when no config file is provided
    pub fn defaults() -> Self {
        let doc = serde_json::json!({
            "window": {
                "width": 1280,
                "height": 720,
                "fps_limit": 60
            },
            "gameplay": {
                "time_scale": 1.0,
                "harvest_range": 80.0,
                "harvest_break_range": 100.0
            },
            "waves": {
                "time_between_waves": 30.0,
                "spawn_delay": 0.5,
                "spawn_margin": 50.0
            },
            "resources": {
                "starting_wood": 100,
                "starting_metal": 50,
                "starting_food": 20,
                "starting_scrap": 0
            }
        });
        Self { doc }
    }

    /// Parse a config document from a JSON string; falls back to defaults
    /// if the document is unparsable (logged, not fatal).
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(doc) => Self { doc },
            Err(e) => {
                tracing::warn!("config unparsable ({}), using defaults", e);
                Self::defaults()
            }
        }
    }

    /// Load from a file path; a missing file yields the defaults.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(_) => {
                tracing::warn!("config file {} not found, using defaults", path);
                Self::defaults()
            }
        }
    }

    /// Walk a dotted path ("window.fps_limit") through the document
    fn lookup(&self, key: &str) -> Option<&Value> {
        let mut current = &self.doc;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        match self.lookup(key).and_then(Value::as_i64) {
            Some(v) => v,
            None => {
                tracing::warn!("config key {} missing or not an integer, using {}", key, default);
                default
            }
        }
    }

    pub fn get_f32(&self, key: &str, default: f32) -> f32 {
        match self.lookup(key).and_then(Value::as_f64) {
            Some(v) => v as f32,
            None => {
                tracing::warn!("config key {} missing or not a number, using {}", key, default);
                default
            }
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.lookup(key).and_then(Value::as_bool) {
            Some(v) => v,
            None => {
                tracing::warn!("config key {} missing or not a bool, using {}", key, default);
                default
            }
        }
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.lookup(key).and_then(Value::as_str) {
            Some(v) => v.to_string(),
            None => {
                tracing::warn!("config key {} missing or not a string, using {}", key, default);
                default.to_string()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}
