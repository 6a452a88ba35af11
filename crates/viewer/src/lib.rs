use std::{env, sync::Arc};

use axum::{extract::State, routing::get, Json, Router};
use fetch::{sample::sample_units, CachedFetcher, Fetcher, HttpClient, RetryPolicy};
use model::unit::Unit;
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::map::MapView;

pub mod map;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8501";
pub const DEFAULT_UNITS_API_URL: &str = "http://localhost:8000/units";

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub bind_address: String,
    pub units_url: String,
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("VIEWER_BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned()),
            units_url: env::var("UNITS_API_URL")
                .unwrap_or_else(|_| DEFAULT_UNITS_API_URL.to_owned()),
        }
    }
}

pub struct ViewerState<H: HttpClient + 'static> {
    fetcher: Arc<CachedFetcher<H>>,
    units_url: Arc<str>,
    sample_units: Arc<[Unit]>,
}

impl<H: HttpClient + 'static> Clone for ViewerState<H> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            units_url: self.units_url.clone(),
            sample_units: self.sample_units.clone(),
        }
    }
}

impl<H: HttpClient + 'static> ViewerState<H> {
    pub fn new(fetcher: CachedFetcher<H>, units_url: &str) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            units_url: Arc::from(units_url),
            sample_units: Arc::from(sample_units()),
        }
    }
}

pub fn routes<H: HttpClient + 'static>(state: ViewerState<H>) -> Router {
    Router::new()
        .route("/api/basic", get(basic_map::<H>))
        .route("/api/milsymbol", get(milsymbol_map::<H>))
        .with_state(state)
        .fallback_service(
            ServeDir::new("./resources/www/")
                .not_found_service(ServeFile::new("./resources/www/error404.html")),
        )
        .layer(TraceLayer::new_for_http())
}

async fn basic_map<H: HttpClient + 'static>(
    State(state): State<ViewerState<H>>,
) -> Json<MapView> {
    let units = state
        .fetcher
        .units(&state.units_url, Some(state.sample_units.clone()))
        .await;
    Json(MapView::basic(&units))
}

async fn milsymbol_map<H: HttpClient + 'static>(
    State(state): State<ViewerState<H>>,
) -> Json<MapView> {
    let features = state.fetcher.features(&state.units_url, None).await;
    Json(MapView::milsymbol(&features))
}

/// Serves the maps until ctrl-c is pressed.
pub async fn start_viewer(config: &ViewerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = Fetcher::with_policy(RetryPolicy::default())?;
    let state = ViewerState::new(CachedFetcher::new(fetcher), &config.units_url);

    let listener = TcpListener::bind(&config.bind_address).await?;
    log::info!(
        "listening on {}, units from {}",
        listener.local_addr()?,
        config.units_url
    );

    axum::serve(listener, routes(state).into_make_service())
        .with_graceful_shutdown(async {
            if let Err(why) = tokio::signal::ctrl_c().await {
                log::error!("could not listen for ctrl-c: {}", why);
            }
        })
        .await?;
    Ok(())
}
