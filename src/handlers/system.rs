use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::database::Store;

pub async fn root<S: Store>(State(state): State<AppState<S>>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Freelance Portal API",
            "version": version,
            "endpoints": {
                "health": "/health",
                "clients": "/api/clients, /api/clients/:id/projects, /api/clients/:id/invoices",
                "projects": "/api/projects",
                "invoices": "/api/invoices, /api/invoices/outstanding",
                "time_entries": "/api/time-entries",
                "files": "/api/files, /api/files/:id, POST /api/files/:filename",
            },
            "filtering": {
                "prefix": state.filter.prefix,
                "grammar": format!("{}<field>[_<operator>]=<value>", state.filter.prefix),
                "operators": ["eq", "neq", "gt", "lt", "like", "in", "between", "isnull", "notnull", "join"],
                "paging": ["page", "size", "sortBy", "direction"],
            }
        }
    }))
}

pub async fn health<S: Store>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.store.backend();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": backend
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed for {} store: {}", backend, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": backend
                    }
                })),
            )
        }
    }
}
