pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Portal CLI - inspect how list filters are parsed, lowered, and evaluated")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, conflicts_with = "json", help = "Output in human-readable text format (default)")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show the filter terms, predicate tree, and SQL for a list query")]
    Explain {
        #[arg(help = "Entity name, table, or route segment (e.g. invoice, time-entries)")]
        entity: String,

        #[arg(help = "Query parameters as key=value", value_parser = utils::parse_param)]
        params: Vec<(String, String)>,
    },

    #[command(about = "Run a list query against a fixture file")]
    Query {
        #[arg(help = "Entity name, table, or route segment")]
        entity: String,

        #[arg(help = "Query parameters as key=value", value_parser = utils::parse_param)]
        params: Vec<(String, String)>,

        #[arg(long, default_value = "fixtures/portal.json", help = "Fixture file to load")]
        fixtures: String,
    },

    #[command(about = "List filterable attributes (all entities when none is given)")]
    Schema {
        #[arg(help = "Entity name")]
        entity: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        match (cli.json, cli.text) {
            (true, false) => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Explain { entity, params } => commands::explain::handle(&entity, &params, output_format),
        Commands::Query { entity, params, fixtures } => {
            commands::query::handle(&entity, &params, &fixtures, output_format).await
        }
        Commands::Schema { entity } => commands::schema::handle(entity.as_deref(), output_format),
    }
}
