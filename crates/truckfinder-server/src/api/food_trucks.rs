use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use truckfinder_core::{Coordinate, FoodTruck};
use truckfinder_locator::{filter_by_food_item, SearchRequest};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Failure body of the raw endpoint.
#[derive(Debug, Serialize)]
struct RetrievalError {
    error: &'static str,
}

/// Serves the cached upstream dataset exactly as it was received.
pub(super) async fn list_raw_food_trucks(State(state): State<AppState>) -> Response {
    match state.locator.cache().get().await {
        Ok(records) => Json(records.as_slice()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch food trucks");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RetrievalError {
                    error: "Failed to fetch food trucks",
                }),
            )
                .into_response()
        }
    }
}

// Kept as strings so bad numbers surface as `validation_error`.
#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius_miles: Option<String>,
    pub food_item: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyTruckItem {
    pub name: String,
    pub address: String,
    pub location_description: Option<String>,
    pub food_items: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
}

impl NearbyTruckItem {
    fn from_truck(truck: FoodTruck, reference: &Coordinate) -> Self {
        let distance_meters = truck.coordinate.distance_to(reference);
        Self {
            name: truck.name,
            address: truck.address,
            location_description: truck.location_description,
            food_items: truck.food_items,
            latitude: truck.coordinate.latitude,
            longitude: truck.coordinate.longitude,
            distance_meters,
        }
    }
}

fn parse_number(value: Option<&str>, field: &str) -> Result<Option<f64>, String> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(format!("{field} must be a finite number")),
    }
}

fn parse_search_request(
    query: &NearbyQuery,
    default_radius_miles: f64,
) -> Result<SearchRequest, String> {
    let latitude = parse_number(query.latitude.as_deref(), "latitude")?
        .ok_or_else(|| "latitude is required".to_owned())?;
    let longitude = parse_number(query.longitude.as_deref(), "longitude")?
        .ok_or_else(|| "longitude is required".to_owned())?;
    let reference = Coordinate::new(latitude, longitude).map_err(|e| e.to_string())?;
    let radius_miles = parse_number(query.radius_miles.as_deref(), "radius_miles")?
        .unwrap_or(default_radius_miles);

    Ok(SearchRequest {
        reference,
        radius_miles,
    })
}

/// Ranks trucks within `radius_miles` of the given point, nearest first.
pub(super) async fn list_nearby_food_trucks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<Vec<NearbyTruckItem>>>, ApiError> {
    let request = parse_search_request(&query, state.locator.default_radius_miles())
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let mut trucks = state.locator.search(Some(request)).await;
    if let Some(term) = query.food_item.as_deref() {
        trucks = filter_by_food_item(trucks, term);
    }

    let data = trucks
        .into_iter()
        .map(|truck| NearbyTruckItem::from_truck(truck, &request.reference))
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
