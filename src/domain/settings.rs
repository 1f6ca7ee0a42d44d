//! Layered execution settings.
//!
//! Settings flow from engine defaults through a user profile to per-call
//! overrides. Each layer is optional, and a `null` value inside a layer means
//! "this layer has no opinion on this key".

use serde_json::{Map, Value};

pub type Settings = Map<String, Value>;

/// Engine-level defaults used when no configuration overrides them.
pub fn engine_defaults() -> Settings {
    let mut settings = Settings::new();
    settings.insert("temperature".to_string(), Value::from(0.7));
    settings.insert("max_tokens".to_string(), Value::from(500));
    settings
}

/// Merge `layers` in order; later layers win key by key.
pub fn cascade<'a, I>(layers: I) -> Settings
where
    I: IntoIterator<Item = Option<&'a Settings>>,
{
    let mut merged = Settings::new();
    for layer in layers.into_iter().flatten() {
        for (key, value) in layer {
            if value.is_null() {
                continue;
            }
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
