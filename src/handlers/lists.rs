use axum::extract::{Path, Query, State};
use serde::Serialize;

use super::AppState;
use crate::api::envelope::PageEnvelope;
use crate::api::list::ListEndpoint;
use crate::api::response::{ApiResponse, ApiResult};
use crate::database::{Entity, Store};
use crate::domain::invoice::{self, InvoiceStatus};
use crate::domain::project;
use crate::domain::{Client, ClientDto, Invoice, InvoiceDto, Project, ProjectDto, TimeEntry, TimeEntryDto};
use crate::filter::Predicate;

type Params = Query<Vec<(String, String)>>;

/// Shared body of every list endpoint: one fetch, rows mapped through `D::from`.
async fn list<S, T, D>(state: &AppState<S>, params: &[(String, String)], base: Option<Predicate>) -> ApiResult<PageEnvelope<D>>
where
    S: Store,
    T: Entity,
    D: From<T> + Serialize,
{
    let store = state.store.clone();
    let envelope = ListEndpoint::from_config(T::schema(), &state.filter)
        .list(
            params,
            base,
            |query| async move { store.fetch_page::<T>(&query).await },
            D::from,
        )
        .await?;
    Ok(ApiResponse::success(envelope))
}

/// GET /api/clients
pub async fn list_clients<S: Store>(State(state): State<AppState<S>>, Query(params): Params) -> ApiResult<PageEnvelope<ClientDto>> {
    list::<S, Client, ClientDto>(&state, &params, None).await
}

/// GET /api/projects
pub async fn list_projects<S: Store>(State(state): State<AppState<S>>, Query(params): Params) -> ApiResult<PageEnvelope<ProjectDto>> {
    list::<S, Project, ProjectDto>(&state, &params, None).await
}

/// GET /api/invoices
pub async fn list_invoices<S: Store>(State(state): State<AppState<S>>, Query(params): Params) -> ApiResult<PageEnvelope<InvoiceDto>> {
    list::<S, Invoice, InvoiceDto>(&state, &params, None).await
}

/// GET /api/time-entries
pub async fn list_time_entries<S: Store>(
    State(state): State<AppState<S>>,
    Query(params): Params,
) -> ApiResult<PageEnvelope<TimeEntryDto>> {
    list::<S, TimeEntry, TimeEntryDto>(&state, &params, None).await
}

/// GET /api/clients/:id/projects
pub async fn client_projects<S: Store>(
    State(state): State<AppState<S>>,
    Path(client_id): Path<i64>,
    Query(params): Params,
) -> ApiResult<PageEnvelope<ProjectDto>> {
    let base = project::specs::belongs_to_client(client_id)?;
    list::<S, Project, ProjectDto>(&state, &params, Some(base)).await
}

/// GET /api/clients/:id/invoices
pub async fn client_invoices<S: Store>(
    State(state): State<AppState<S>>,
    Path(client_id): Path<i64>,
    Query(params): Params,
) -> ApiResult<PageEnvelope<InvoiceDto>> {
    let base = invoice::specs::belongs_to_client(client_id)?;
    list::<S, Invoice, InvoiceDto>(&state, &params, Some(base)).await
}

/// GET /api/invoices/outstanding - sent or overdue
pub async fn outstanding_invoices<S: Store>(
    State(state): State<AppState<S>>,
    Query(params): Params,
) -> ApiResult<PageEnvelope<InvoiceDto>> {
    let base = invoice::specs::has_any_status(InvoiceStatus::OUTSTANDING)?;
    list::<S, Invoice, InvoiceDto>(&state, &params, Some(base)).await
}
