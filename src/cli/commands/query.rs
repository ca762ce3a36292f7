use serde::Serialize;

use crate::api::envelope::PageEnvelope;
use crate::api::list::{ListEndpoint, ListError};
use crate::cli::utils::{lookup_entity, print_json};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{Entity, MemoryStore, Store};
use crate::domain::{Client, ClientDto, Fixtures, Invoice, InvoiceDto, Project, ProjectDto, TimeEntry, TimeEntryDto};

pub async fn handle(
    entity: &str,
    params: &[(String, String)],
    fixtures: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let schema = lookup_entity(entity)?;
    let store = Fixtures::load(fixtures)?.into_store()?;

    match schema.name {
        "client" => run::<Client, ClientDto>(&store, params, output_format).await,
        "project" => run::<Project, ProjectDto>(&store, params, output_format).await,
        "invoice" => run::<Invoice, InvoiceDto>(&store, params, output_format).await,
        "timeEntry" => run::<TimeEntry, TimeEntryDto>(&store, params, output_format).await,
        other => anyhow::bail!("No list query registered for '{}'", other),
    }
}

async fn run<T, D>(store: &MemoryStore, params: &[(String, String)], output_format: OutputFormat) -> anyhow::Result<()>
where
    T: Entity,
    D: From<T> + Serialize,
{
    let envelope: PageEnvelope<D> = ListEndpoint::from_config(T::schema(), &config().filter)
        .list(params, None, |query| async move { store.fetch_page::<T>(&query).await }, D::from)
        .await
        .map_err(|e| match e {
            ListError::Filter(e) => anyhow::Error::from(e),
            ListError::Fetch(e) => anyhow::Error::from(e),
        })?;

    match output_format {
        OutputFormat::Json => print_json(&envelope),
        OutputFormat::Text => {
            println!(
                "Page {} of {} ({} item(s) total, size {})",
                envelope.page + 1,
                envelope.total_pages.max(1),
                envelope.total_items,
                envelope.size
            );
            for item in &envelope.items {
                println!("  {}", serde_json::to_string(item)?);
            }
            Ok(())
        }
    }
}
