use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::{header, Method, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use milsym::{database::Database, RequestError};
use model::{
    feature::{UnitFeature, UnitFeatureCollection, UnitFeaturePatch},
    WithId,
};
use serde::Deserialize;
use utility::let_also::LetAlso;

use crate::{
    common::{schema, RouteErrorResponse, RouteResult},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        format!("/units{}", format_args!($($arg)*))
    };
}

pub(crate) fn routes<D>(state: WebState<D>) -> Router
where
    D: Database + 'static,
{
    Router::new()
        .route("/units", get(list_units::<D>).post(create_unit::<D>))
        .route("/units/", get(list_units::<D>).post(create_unit::<D>))
        .route(
            "/units/schema",
            get(schema::<UnitFeature>)
                .put(schema_is_not_a_unit)
                .delete(schema_is_not_a_unit),
        )
        .route(
            "/units/:id",
            get(get_unit::<D>)
                .put(update_unit::<D>)
                .delete(delete_unit::<D>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    page: Option<usize>,
}

fn failed(
    why: impl Into<RouteErrorResponse>,
    method: Method,
    uri: &Uri,
) -> RouteErrorResponse {
    why.into().with_method(&method).with_uri(uri.path())
}

/// `schema` is never a unit id, so writes to it fail like any unknown id.
async fn schema_is_not_a_unit(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
) -> RouteErrorResponse {
    failed(RequestError::NotFound("schema".to_owned()), method, &original_uri)
}

async fn create_unit<D: Database + 'static>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { unit_client }): State<WebState<D>>,
    body: Result<Json<UnitFeature>, JsonRejection>,
) -> RouteResult<(StatusCode, [(header::HeaderName, String); 1], Json<WithId<UnitFeature>>)> {
    let Json(unit) = body.map_err(|why| failed(why, Method::POST, &original_uri))?;
    unit_client
        .create_unit(unit)
        .await
        .map(|created| {
            (
                StatusCode::CREATED,
                [(header::LOCATION, resource!("/{}", created.id))],
                Json(created),
            )
        })
        .map_err(|why| failed(why, Method::POST, &original_uri))
}

async fn list_units<D: Database + 'static>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { unit_client }): State<WebState<D>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> RouteResult<Json<UnitFeatureCollection>> {
    let Query(params) = params.map_err(|why| failed(why, Method::GET, &original_uri))?;
    let units = match params.page {
        Some(page) => unit_client.list_units_page(page).await,
        None => unit_client.list_units().await,
    };
    units
        .map(|units| UnitFeatureCollection::new(units).let_owned(Json))
        .map_err(|why| failed(why, Method::GET, &original_uri))
}

async fn get_unit<D: Database + 'static>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { unit_client }): State<WebState<D>>,
) -> RouteResult<Json<WithId<UnitFeature>>> {
    unit_client
        .get_unit(&id)
        .await
        .map(Json)
        .map_err(|why| failed(why, Method::GET, &original_uri))
}

async fn update_unit<D: Database + 'static>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { unit_client }): State<WebState<D>>,
    body: Result<Json<UnitFeaturePatch>, JsonRejection>,
) -> RouteResult<Json<WithId<UnitFeature>>> {
    let Json(patch) = body.map_err(|why| failed(why, Method::PUT, &original_uri))?;
    unit_client
        .update_unit(&id, patch)
        .await
        .map(Json)
        .map_err(|why| failed(why, Method::PUT, &original_uri))
}

async fn delete_unit<D: Database + 'static>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { unit_client }): State<WebState<D>>,
) -> RouteResult<StatusCode> {
    unit_client
        .delete_unit(&id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|why| failed(why, Method::DELETE, &original_uri))
}
