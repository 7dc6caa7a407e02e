//! Axum API server module
//!
//! JSON surface over the profile tables, the geographic resolver, the
//! photo classifier and the feature assembler. Response bodies follow the
//! `{"success": bool, ...}` convention throughout; lookup misses are
//! reported as `success: false`, not as transport errors.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::assembler::{assemble, SimpleInputs};
use crate::profiles::{SoilType, WaterLevel};
use crate::regional::{self, OpenWeatherClient, WeatherProvider, WeatherService};
use crate::vision;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<WeatherService>,
}

impl AppState {
    pub fn new(weather: WeatherService) -> Self {
        Self { weather: Arc::new(weather) }
    }

    /// Build state from the environment: a live weather provider when
    /// `OPENWEATHER_API_KEY` is set, seasonal estimates otherwise.
    pub fn from_env() -> Self {
        let provider = OpenWeatherClient::from_env()
            .map(|client| Arc::new(client) as Arc<dyn WeatherProvider>);
        match &provider {
            Some(_) => tracing::info!("live weather provider configured"),
            None => tracing::info!("no weather API key, using seasonal estimates"),
        }
        Self::new(WeatherService::new(provider))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Catalog endpoints (static tables)
        .route("/soil/types", get(list_soil_types))
        .route("/water-levels", get(list_water_levels))
        .route("/states", get(list_states))
        .route("/districts/:state", get(list_districts))

        // Lookup endpoints
        .route("/soil/by-type", post(soil_by_type))
        .route("/soil/regional", post(soil_regional))
        .route("/weather", post(weather_lookup))
        .route("/auto-fill", post(auto_fill))

        // Inference endpoints
        .route("/convert-simple", post(convert_simple))
        .route("/soil/analyze-image", post(analyze_soil_image))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Localized-name slice as a JSON object.
fn localized(names: &[(&str, &str)]) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = names
        .iter()
        .map(|(code, name)| (code.to_string(), json!(name)))
        .collect();
    serde_json::Value::Object(map)
}

async fn list_soil_types() -> impl IntoResponse {
    let soil_types: Vec<_> = SoilType::all()
        .iter()
        .map(|t| {
            let profile = t.profile();
            json!({
                "id": t.id(),
                "name": profile.name,
                "local_names": localized(profile.local_names),
                "description": profile.description,
                "recommended_crops": profile.crops,
                "estimated_values": {
                    "N": profile.n,
                    "P": profile.p,
                    "K": profile.k,
                    "ph": profile.ph,
                },
            })
        })
        .collect();

    Json(json!({
        "success": true,
        "soil_types": soil_types,
    }))
}

async fn list_water_levels() -> impl IntoResponse {
    let water_levels: Vec<_> = WaterLevel::all()
        .iter()
        .map(|level| {
            let profile = level.profile();
            json!({
                "id": level.id(),
                "rainfall_mm": profile.rainfall_mm,
                "labels": localized(profile.labels),
            })
        })
        .collect();

    Json(json!({
        "success": true,
        "water_levels": water_levels,
    }))
}

async fn list_states() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "states": regional::records::states(),
    }))
}

async fn list_districts(Path(state): Path<String>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "state": state,
        "districts": regional::records::districts(&state),
    }))
}

#[derive(Debug, Deserialize)]
struct SoilTypeRequest {
    soil_type: Option<String>,
}

async fn soil_by_type(
    Json(body): Json<SoilTypeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(id) = body.soil_type else {
        return Err(ApiError::Input("Please provide soil_type".into()));
    };

    match crate::profiles::lookup_soil_type(&id) {
        Some(profile) => Ok(Json(json!({
            "success": true,
            "N": profile.n,
            "P": profile.p,
            "K": profile.k,
            "ph": profile.ph,
            "name": profile.name,
            "description": profile.description,
            "recommended_crops": profile.crops,
        }))),
        // Lookup miss, not a transport error.
        None => Ok(Json(json!({
            "success": false,
            "error": "Unknown soil type",
        }))),
    }
}

#[derive(Debug, Deserialize)]
struct RegionRequest {
    state: Option<String>,
    district: Option<String>,
}

async fn soil_regional(
    Json(body): Json<RegionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(state), Some(district)) = (body.state, body.district) else {
        return Err(ApiError::Input("Please provide state and district".into()));
    };

    // Defaults never fail: every region resolves to some tier.
    let estimate = regional::resolve_soil(&state, &district);
    Ok(Json(json!({
        "success": true,
        "N": estimate.n,
        "P": estimate.p,
        "K": estimate.k,
        "ph": estimate.ph,
        "soil_type": estimate.tag,
        "tier": estimate.tier,
        "source": estimate.tier.description(),
    })))
}

#[derive(Debug, Deserialize)]
struct WeatherRequest {
    lat: Option<f64>,
    lon: Option<f64>,
    state: Option<String>,
    district: Option<String>,
}

async fn weather_lookup(
    State(app): State<AppState>,
    Json(body): Json<WeatherRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Coordinates win when both forms are present.
    let (estimate, source) = match (body.lat, body.lon, body.state, body.district) {
        (Some(lat), Some(lon), _, _) => app.weather.resolve(lat, lon).await,
        (_, _, Some(state), Some(district)) => {
            app.weather.resolve_by_location(&state, &district).await
        }
        _ => {
            return Err(ApiError::Input(
                "Please provide either lat/lon or state/district".into(),
            ))
        }
    };

    Ok(Json(json!({
        "success": true,
        "temperature": estimate.temperature,
        "humidity": estimate.humidity,
        "rainfall": estimate.rainfall,
        "source": source,
    })))
}

async fn auto_fill(
    State(app): State<AppState>,
    Json(body): Json<RegionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(state), Some(district)) = (body.state, body.district) else {
        return Err(ApiError::Input("Please provide state and district".into()));
    };

    let (weather, weather_source) = app.weather.resolve_by_location(&state, &district).await;
    let soil = regional::resolve_soil(&state, &district);

    Ok(Json(json!({
        "success": true,
        "location": { "state": state, "district": district },
        "weather": {
            "temperature": weather.temperature,
            "humidity": weather.humidity,
            "rainfall": weather.rainfall,
            "source": weather_source,
        },
        "soil": {
            "N": soil.n,
            "P": soil.p,
            "K": soil.k,
            "ph": soil.ph,
            "soil_type": soil.tag,
        },
        "source": soil.tier.description(),
    })))
}

async fn convert_simple(
    State(app): State<AppState>,
    Json(inputs): Json<SimpleInputs>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = assemble(&inputs, &app.weather).await;

    Ok(Json(json!({
        "success": true,
        "technical_values": result.features,
        "provenance": result.provenance,
        "weather_source": result.weather_source,
    })))
}

async fn analyze_soil_image(
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut image_bytes: Option<Vec<u8>> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("image") {
            continue;
        }
        if field.file_name().unwrap_or("").is_empty() {
            return Err(ApiError::Input("No selected file".into()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Input(format!("Failed to read upload: {e}")))?;
        image_bytes = Some(bytes.to_vec());
        break;
    }

    let Some(bytes) = image_bytes else {
        return Err(ApiError::Input("No image file provided".into()));
    };

    let scan = vision::classify(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "soil_type": scan.soil_class.display_name(),
        "confidence": scan.confidence,
        "estimates": scan.nutrients,
        "moisture_percent": scan.moisture_percent,
        "message": scan.soil_class.note(),
        "color_detected": scan.mean_color.display(),
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

/// Route-level errors, mapped onto the `{"success": false}` convention.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request fields (400)
    Input(String),

    /// Image bytes that would not decode (500)
    Decode(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Input(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Decode(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
