use anyhow::{Context, Result};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use axum::{
    body::Bytes,
    extract::State,
    http::Uri,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use super::api_error::ApiError;
use super::metrics::{self, metrics_handler};
use super::payload::{decode_body, decode_insert_record};
use super::routes::Route;
use super::state::ServerState;
use super::{cors, log_requests, ServerConfig};
use crate::training::{TrainingError, TrainingManager};
use crate::training_store::{CommitGate, TableSet};

const INSERTED_MESSAGE: &str = "Data inserted successfully";
const DELETED_MESSAGE: &str = "Record deleted successfully";

/// Runs a manager call on the blocking pool, bounded by the configured store timeout.
///
/// On timeout the call's [`CommitGate`] is abandoned, so a write that has not
/// started committing rolls back and the caller gets [`ApiError::Timeout`]. A
/// write that already started committing is waited for and its own result is
/// returned, so a 500 never hides a committed write.
async fn run_store<T, F>(
    state: &ServerState,
    operation: &'static str,
    call: F,
) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&TrainingManager, &CommitGate) -> Result<T, TrainingError> + Send + 'static,
{
    let manager = state.training_manager.clone();
    let timeout = state.config.store_timeout;
    let gate = Arc::new(CommitGate::new());
    let start = Instant::now();

    let task_gate = gate.clone();
    let mut task = tokio::task::spawn_blocking(move || call(&manager, &task_gate));
    let timed = tokio::time::timeout(timeout, &mut task).await;
    let outcome = match timed {
        Ok(joined) => joined,
        Err(_) if gate.abandon() => {
            metrics::record_store_operation(operation, start.elapsed());
            return Err(ApiError::Timeout(timeout));
        }
        Err(_) => {
            warn!(
                "{} passed its timeout while committing, waiting for it",
                operation
            );
            task.await
        }
    };
    metrics::record_store_operation(operation, start.elapsed());

    match outcome {
        Ok(result) => result.map_err(ApiError::from),
        Err(join_error) => Err(ApiError::Store(format!("Store task failed: {}", join_error))),
    }
}

async fn fetch_parts(state: &ServerState, tables: TableSet) -> Result<Response, ApiError> {
    let parts = run_store(state, "fetch_parts", move |manager, _| {
        manager.fetch_parts(tables)
    })
    .await?;
    Ok(Json(parts).into_response())
}

async fn fetch_menus(state: &ServerState, tables: TableSet) -> Result<Response, ApiError> {
    let menus = run_store(state, "fetch_menus", move |manager, _| {
        manager.fetch_menus(tables)
    })
    .await?;
    Ok(Json(menus).into_response())
}

async fn fetch_records(state: &ServerState, tables: TableSet) -> Result<Response, ApiError> {
    let records = run_store(state, "fetch_records", move |manager, _| {
        manager.fetch_records(tables)
    })
    .await?;
    let records: Vec<Value> = records
        .iter()
        .map(|record| record.to_wire_json(tables))
        .collect();
    Ok(Json(records).into_response())
}

async fn insert_record(state: &ServerState, body: &[u8]) -> Result<Response, ApiError> {
    let request = decode_insert_record(body)?;
    run_store(state, "insert_record", move |manager, gate| {
        manager.insert_record(request, gate)
    })
    .await?;
    Ok(Json(json!({ "message": INSERTED_MESSAGE })).into_response())
}

async fn insert_menu(state: &ServerState, body: &[u8]) -> Result<Response, ApiError> {
    let request = decode_body(body)?;
    run_store(state, "insert_menu", move |manager, gate| {
        manager.insert_menu(request, gate)
    })
    .await?;
    Ok(Json(json!({ "message": INSERTED_MESSAGE })).into_response())
}

async fn delete_record(state: &ServerState, body: &[u8]) -> Result<Response, ApiError> {
    let request = decode_body(body)?;
    run_store(state, "delete_record", move |manager, gate| {
        manager.delete_record(request, gate)
    })
    .await?;
    Ok(Json(json!({ "message": DELETED_MESSAGE })).into_response())
}

async fn handle(state: &ServerState, route: Route, body: &[u8]) -> Result<Response, ApiError> {
    match route {
        Route::FetchPart => fetch_parts(state, TableSet::Current).await,
        Route::FetchMenu => fetch_menus(state, TableSet::Current).await,
        Route::FetchRecords => fetch_records(state, TableSet::Current).await,
        Route::InsertRecord => insert_record(state, body).await,
        Route::InsertMenu => insert_menu(state, body).await,
        Route::DeleteRecord => delete_record(state, body).await,
        Route::FetchOldPart => fetch_parts(state, TableSet::Archive).await,
        Route::FetchOldMenu => fetch_menus(state, TableSet::Archive).await,
        Route::FetchOldRecords => fetch_records(state, TableSet::Archive).await,
    }
}

/// Dispatches on the last path segment regardless of the HTTP method.
async fn dispatch(State(state): State<ServerState>, uri: Uri, body: Bytes) -> Response {
    let Some(route) = Route::from_path(uri.path()) else {
        metrics::record_error(ApiError::NotFound.kind(), "unmatched");
        return ApiError::NotFound.into_response();
    };

    match handle(&state, route, &body).await {
        Ok(response) => response,
        Err(err) => {
            if err.status().is_server_error() {
                error!("{} failed: {}", route.name(), err);
            } else {
                warn!("{} rejected: {}", route.name(), err);
            }
            metrics::record_error(err.kind(), route.name());
            err.into_response()
        }
    }
}

pub fn make_app(state: ServerState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(middleware::from_fn(cors))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(config: ServerConfig, training_manager: TrainingManager) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(ServerState::new(config, training_manager));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(("0.0.0.0", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            result.context("HTTP server failed")?;
        }
        result = axum::serve(metrics_listener, make_metrics_app()).into_future() => {
            result.context("Metrics server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}
