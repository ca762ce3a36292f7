use serde_json::{json, Value};

use crate::cli::utils::{lookup_entity, print_json};
use crate::cli::OutputFormat;
use crate::domain::ENTITIES;
use crate::filter::{EntitySchema, Kind};

fn describe(schema: &EntitySchema) -> Value {
    let attributes: Vec<Value> = schema
        .attributes
        .iter()
        .map(|attribute| {
            let mut entry = json!({
                "name": attribute.name,
                "column": attribute.column,
                "kind": attribute.kind.name(),
            });
            match attribute.kind {
                Kind::Enum(values) => entry["values"] = json!(values),
                Kind::Relation { target, via } => {
                    entry["target"] = json!(target.name);
                    entry["via"] = json!(via);
                }
                _ => {}
            }
            entry
        })
        .collect();

    json!({ "name": schema.name, "table": schema.table, "attributes": attributes })
}

pub fn handle(entity: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let schemas: Vec<&EntitySchema> = match entity {
        Some(name) => vec![lookup_entity(name)?],
        None => ENTITIES.to_vec(),
    };

    match output_format {
        OutputFormat::Json => print_json(&schemas.iter().map(|s| describe(s)).collect::<Vec<_>>()),
        OutputFormat::Text => {
            for schema in schemas {
                println!("{} ({})", schema.name, schema.table);
                for attribute in schema.attributes {
                    match attribute.kind {
                        Kind::Relation { target, via } => {
                            println!("  {:<12} -> {} via {}", attribute.name, target.name, via)
                        }
                        Kind::Enum(values) => println!("  {:<12} enum [{}]", attribute.name, values.join(", ")),
                        kind => println!("  {:<12} {}", attribute.name, kind.name()),
                    }
                }
            }
            Ok(())
        }
    }
}
