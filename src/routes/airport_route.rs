use crate::models::airport::{Airport, AirportListResponse};
use crate::models::route::RouteDetail;
use crate::services::airport_service::AirportService;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// List airports
#[openapi(tag = "Airports")]
#[get("/airports")]
pub async fn list_airports(
    airport_service: &State<AirportService>,
) -> Result<Json<AirportListResponse>, AppError> {
    Ok(Json(airport_service.list_airports().await?))
}

/// Get an airport by its three-letter code
#[openapi(tag = "Airports")]
#[get("/airports/<airport_code>")]
pub async fn get_airport(
    airport_code: String,
    airport_service: &State<AirportService>,
) -> Result<Json<Airport>, AppError> {
    Ok(Json(airport_service.get_airport(&airport_code).await?))
}

/// Get a route with its weekly schedule
#[openapi(tag = "Airports")]
#[get("/routes/<route_no>")]
pub async fn get_route(
    route_no: String,
    airport_service: &State<AirportService>,
) -> Result<Json<RouteDetail>, AppError> {
    Ok(Json(airport_service.get_route(&route_no).await?))
}
