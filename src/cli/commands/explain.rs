use serde_json::json;

use crate::api::list::ListEndpoint;
use crate::cli::utils::{lookup_entity, print_json};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::query_builder::QueryBuilder;
use crate::filter::FilterParser;

pub fn handle(entity: &str, params: &[(String, String)], output_format: OutputFormat) -> anyhow::Result<()> {
    let schema = lookup_entity(entity)?;
    let filter = &config().filter;

    let terms = FilterParser::parse(&FilterParser::extract(params, &filter.prefix));
    let query = ListEndpoint::from_config(schema, filter).prepare(params, None)?;

    let builder = QueryBuilder::<()>::new(schema)
        .filter(query.predicate.as_ref())
        .order(&query.sort, query.paging.sort_direction)
        .page(query.paging.page_size, query.paging.offset());
    let select = builder.to_sql();
    let count = builder.to_count_sql();

    match output_format {
        OutputFormat::Json => print_json(&json!({
            "entity": schema.name,
            "terms": terms,
            "predicate": query.predicate.as_ref().map(|p| p.to_string()),
            "paging": query.paging,
            "sql": select.query,
            "countSql": count.query,
            "params": select.params,
        })),
        OutputFormat::Text => {
            println!("Entity:    {} ({})", schema.name, schema.table);
            println!("Terms:     {}", terms.len());
            for term in &terms {
                println!("  {} {} {:?}", term.path, term.op, term.value);
            }
            match &query.predicate {
                Some(predicate) => println!("Predicate: {}", predicate),
                None => println!("Predicate: (match all)"),
            }
            println!(
                "Paging:    page {} size {} sort {} {}",
                query.paging.page_index,
                query.paging.page_size,
                query.paging.sort_field,
                query.paging.sort_direction.to_sql()
            );
            println!("SQL:       {}", select.query);
            println!("Count:     {}", count.query);
            for (i, param) in select.params.iter().enumerate() {
                println!("  ${} = {}", i + 1, param);
            }
            Ok(())
        }
    }
}
