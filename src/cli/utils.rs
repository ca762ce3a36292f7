use anyhow::anyhow;
use serde::Serialize;

use crate::domain::entity_schema;
use crate::filter::EntitySchema;

/// clap value parser for `key=value` arguments. The value may be empty.
pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("missing key in '{}'", raw)),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected key=value, got '{}'", raw)),
    }
}

pub fn lookup_entity(name: &str) -> anyhow::Result<&'static EntitySchema> {
    entity_schema(name).ok_or_else(|| anyhow!("Unknown entity '{}'", name))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
