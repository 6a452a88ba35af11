pub use crate::common::RouteResult;

use std::env;

use axum::{routing::on, Router};
use milsym::{client::Client, database::Database};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::common::{route_not_found, METHOD_FILTER_ALL};

pub mod api;
pub mod common;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

#[derive(Clone)]
pub struct WebState<D>
where
    D: Database + 'static,
{
    pub unit_client: Client<D>,
}

impl<D> WebState<D>
where
    D: Database + 'static,
{
    pub fn new(database: D) -> Self {
        Self {
            unit_client: Client::new(database),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_address: String,
}

impl WebConfig {
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("WEB_BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned()),
        }
    }
}

pub fn routes<D>(state: WebState<D>) -> Router
where
    D: Database + 'static,
{
    api::routes(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(TraceLayer::new_for_http())
}

/// Serves the api until ctrl-c is pressed.
pub async fn start_web_server<D>(state: WebState<D>, config: &WebConfig) -> std::io::Result<()>
where
    D: Database + 'static,
{
    let listener = TcpListener::bind(&config.bind_address).await?;
    log::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, routes(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(why) = tokio::signal::ctrl_c().await {
        log::error!("could not listen for ctrl-c: {}", why);
    }
    log::info!("shutting down");
}
