//! Example gallery seed store.
//!
//! The demo ships a JSON mapping of image filename → tuning parameters used
//! to pre-populate example entries. Only the binary reads this; the core
//! pipeline never does.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

/// Per-example tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ExampleParams {
    pub scale: f32,
    pub margin: i32,
    pub text_scale: f32,
}

/// Load the gallery seed file.
///
/// Returns an empty map if the file doesn't exist or is invalid.
pub fn load_examples(path: &Path) -> HashMap<String, ExampleParams> {
    match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
        Err(_) => HashMap::new(),
    }
}
