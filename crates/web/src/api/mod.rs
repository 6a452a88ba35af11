use axum::{response::IntoResponse, routing::get, Json, Router};
use milsym::database::Database;
use serde_json::json;

pub mod units;

use crate::WebState;

pub fn routes<D>(state: WebState<D>) -> Router
where
    D: Database + 'static,
{
    Router::new()
        .route("/", get(root))
        .merge(units::routes(state))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Root working"
    }))
}
