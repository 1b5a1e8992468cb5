use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    Atlas, AtlasError, VERSION,
    models::{Airport, AirportDetails, Forecast, MapView, Region},
};

type ApiResult<T> = std::result::Result<Json<T>, AtlasError>;

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(rename = "upstreamStatus", skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl IntoResponse for AtlasError {
    fn into_response(self) -> Response {
        let status = match &self {
            AtlasError::Validation { .. } => StatusCode::BAD_REQUEST,
            AtlasError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let body = ApiError {
            error: self.user_message(),
            upstream_status: self.upstream_status_code(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Deserialize)]
pub struct ContinentQuery {
    #[serde(default)]
    pub continent: String,
}

#[derive(Deserialize)]
pub struct AirportsQuery {
    #[serde(default)]
    pub continent: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct ForecastQuery {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
pub struct RegionsQuery {
    #[serde(default)]
    pub country: String,
}

#[derive(Deserialize)]
pub struct MapViewQuery {
    pub continent: Option<String>,
    pub country: Option<String>,
    pub airport: Option<String>,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub airports: usize,
    pub countries: usize,
}

pub fn router(atlas: Arc<Atlas>) -> Router {
    Router::new()
        .route("/continents", get(get_continents))
        .route("/countries", get(get_countries))
        .route("/airports", get(get_airports))
        .route("/airports/{id}", get(get_airport_by_id))
        .route("/search", get(search_airports))
        .route("/forecast", get(get_forecast))
        .route("/regions", get(get_regions))
        .route("/map-view", get(get_map_view))
        .route("/health", get(health))
        .with_state(atlas)
}

async fn get_continents(State(atlas): State<Arc<Atlas>>) -> ApiResult<Vec<String>> {
    Ok(Json(atlas.continents()?))
}

async fn get_countries(
    State(atlas): State<Arc<Atlas>>,
    Query(query): Query<ContinentQuery>,
) -> ApiResult<Vec<String>> {
    Ok(Json(atlas.countries(&query.continent)?))
}

async fn get_airports(
    State(atlas): State<Arc<Atlas>>,
    Query(query): Query<AirportsQuery>,
) -> ApiResult<Vec<Airport>> {
    Ok(Json(atlas.airports(&query.continent, &query.country)?))
}

async fn get_airport_by_id(
    State(atlas): State<Arc<Atlas>>,
    Path(id): Path<String>,
) -> Result<Response, AtlasError> {
    Ok(match atlas.airport_details(&id)? {
        Some(details) => Json::<AirportDetails>(details).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("Airport {id} not found"),
                upstream_status: None,
            }),
        )
            .into_response(),
    })
}

async fn search_airports(
    State(atlas): State<Arc<Atlas>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Airport>> {
    Ok(Json(atlas.search(&query.query, query.limit)?))
}

async fn get_forecast(
    State(atlas): State<Arc<Atlas>>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Forecast> {
    Ok(Json(atlas.forecast(query.latitude, query.longitude).await?))
}

async fn get_regions(
    State(atlas): State<Arc<Atlas>>,
    Query(query): Query<RegionsQuery>,
) -> ApiResult<Vec<Region>> {
    Ok(Json(atlas.regions(&query.country)?))
}

async fn get_map_view(
    State(atlas): State<Arc<Atlas>>,
    Query(query): Query<MapViewQuery>,
) -> ApiResult<MapView> {
    Ok(Json(atlas.map_view(
        query.continent.as_deref(),
        query.country.as_deref(),
        query.airport.as_deref(),
    )?))
}

async fn health(State(atlas): State<Arc<Atlas>>) -> ApiResult<Health> {
    let index = atlas.index()?;
    Ok(Json(Health {
        status: "ok",
        version: VERSION,
        airports: index.len(),
        countries: index.country_count(),
    }))
}
