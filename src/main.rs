mod api;
mod bookkeeping;
mod cache;
mod config;
mod error;
mod models;
mod providers;
mod services;

use std::sync::Arc;

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use api::trip::TripState;
use config::Config;
use providers::geocoder::Geocoder;
use providers::route_client::RouteClient;
use services::trip_orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eld_trip_planner=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("ELD_CONFIG_PATH").ok();
    let config = Config::load(config_path.as_deref())?;

    info!(
        bind_host = %config.bind_host,
        bind_port = config.bind_port,
        osrm_base_url = %config.osrm_base_url,
        nominatim_base_url = %config.nominatim_base_url,
        "starting ELD trip planner"
    );

    let route_client = Arc::new(RouteClient::new(config.osrm_base_url.clone(), config.route_timeout_secs));
    let geocoder = Arc::new(Geocoder::new(
        config.nominatim_base_url.clone(),
        config.geocode_cache_dir.clone(),
        config.geocode_timeout_secs,
    ));
    let orchestrator = Arc::new(Orchestrator::new(route_client, geocoder));
    let trip_state = TripState { orchestrator };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = api::router(trip_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let bind_addr = format!("{}:{}", config.bind_host, config.bind_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
