use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::{config, SecurityConfig};
use crate::database::Store;
use crate::handlers::{files, lists, system, AppState};
use crate::is_development;

pub fn app<S: Store>(state: AppState<S>) -> Router {
    let config = config();
    let level = if config.api.enable_request_logging { Level::INFO } else { Level::DEBUG };

    Router::new()
        // Public
        .route("/", get(system::root::<S>))
        .route("/health", get(system::health::<S>))
        .merge(list_routes::<S>())
        .merge(file_routes::<S>())
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(level))
                .on_response(DefaultOnResponse::new().level(level)),
        )
        .with_state(state)
}

fn list_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/api/clients", get(lists::list_clients::<S>))
        .route("/api/clients/:id/projects", get(lists::client_projects::<S>))
        .route("/api/clients/:id/invoices", get(lists::client_invoices::<S>))
        .route("/api/projects", get(lists::list_projects::<S>))
        .route("/api/invoices", get(lists::list_invoices::<S>))
        .route("/api/invoices/outstanding", get(lists::outstanding_invoices::<S>))
        .route("/api/time-entries", get(lists::list_time_entries::<S>))
}

fn file_routes<S: Store>() -> Router<AppState<S>> {
    // POST takes a filename, GET/DELETE an id; axum needs one name per segment.
    Router::new()
        .route("/api/files", get(files::list_files::<S>))
        .route(
            "/api/files/:key",
            post(files::upload_file::<S>)
                .get(files::get_file::<S>)
                .delete(files::delete_file::<S>),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if is_development!() {
        return CorsLayer::permissive();
    }

    let origins = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
}
