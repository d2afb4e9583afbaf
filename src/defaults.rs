use std::str::FromStr;

use serde_json::{Map, Value};

use crate::model::{Platform, Summary};

/// Zero-valued summary for a platform named by string, as loosely-typed JSON.
///
/// An unknown platform yields an empty object so callers can merge the result unconditionally.
pub fn default_stats(platform: &str) -> Value {
    Platform::from_str(platform)
        .ok()
        .and_then(|p| serde_json::to_value(Summary::default_for(p)).ok())
        .unwrap_or_else(|| Value::Object(Map::new()))
}
