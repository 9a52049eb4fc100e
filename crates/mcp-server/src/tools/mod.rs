pub mod github;
pub mod notes;

use serde_json::Value;

use recap_domain::{Error, Result};

/// Extract a required string argument.
pub(crate) fn required_str<'a>(arguments: &'a Value, key: &str) -> Result<&'a str> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::InvalidArgument(format!("missing required argument: {key}")))
}
