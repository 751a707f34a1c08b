use crate::models::flight::FlightExport;
use crate::services::flight_service::FlightService;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Export all flights as JSON
#[openapi(tag = "Export")]
#[get("/export/flights")]
pub async fn export_flights(
    flight_service: &State<FlightService>,
) -> Result<Json<FlightExport>, AppError> {
    Ok(Json(flight_service.export_flights().await?))
}

/// Export flights that have yet to depart
#[openapi(tag = "Export")]
#[get("/export/flights/upcoming")]
pub async fn export_upcoming_flights(
    flight_service: &State<FlightService>,
) -> Result<Json<FlightExport>, AppError> {
    Ok(Json(flight_service.export_upcoming_flights().await?))
}
