use axum::{
    Router,
    extract::Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{PlanState, evaluate_plan};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("finplan API listening on http://{addr}");
    println!("finplan API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/defaults", get(defaults_handler))
        .fallback(not_found_handler)
}

/// POST takes a full snapshot; absent fields merge in from the defaults, so
/// clients holding an older saved shape stay compatible.
async fn project_post_handler(Json(state): Json<PlanState>) -> Response {
    respond_with_projection(&state)
}

/// GET projects the default snapshot; a smoke check for fresh clients.
async fn project_get_handler() -> Response {
    respond_with_projection(&PlanState::default())
}

async fn defaults_handler() -> Response {
    json_response(StatusCode::OK, PlanState::default())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn respond_with_projection(state: &PlanState) -> Response {
    match evaluate_plan(state) {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(err) => {
            log::warn!("rejected snapshot: {err}");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
