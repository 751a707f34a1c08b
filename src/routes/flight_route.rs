use crate::models::airplane::AvailableSeatsResponse;
use crate::models::flight::{
    FlightDetail, FlightSearchQuery, FlightSearchResponse, FlightStatusUpdate,
};
use crate::services::flight_service::FlightService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use chrono::NaiveDate;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Search flights
///
/// `departure` and `arrival` match an airport code or city by substring;
/// `date` (YYYY-MM-DD) matches the scheduled departure day.
#[openapi(tag = "Flights")]
#[get("/flights/search?<departure>&<arrival>&<date>")]
pub async fn search_flights(
    departure: Option<String>,
    arrival: Option<String>,
    date: Option<String>,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightSearchResponse>, AppError> {
    let date = match date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => Some(
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest("Invalid date format".into()))?,
        ),
        None => None,
    };

    let query = FlightSearchQuery {
        departure,
        arrival,
        date,
    };
    let flights = flight_service.search_flights(query).await?;
    Ok(Json(flights))
}

/// Get a single flight
#[openapi(tag = "Flights")]
#[get("/flights/<flight_id>")]
pub async fn get_flight(
    flight_id: i32,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightDetail>, AppError> {
    let flight = flight_service.get_flight(flight_id).await?;
    Ok(Json(flight))
}

/// List seats without a boarding pass on a flight
#[openapi(tag = "Flights")]
#[get("/flights/<flight_id>/seats")]
pub async fn get_available_seats(
    flight_id: i32,
    flight_service: &State<FlightService>,
) -> Result<Json<AvailableSeatsResponse>, AppError> {
    let seats = flight_service.get_available_seats(flight_id).await?;
    Ok(Json(seats))
}

/// Update a flight's status and actual times (admin only)
#[openapi(tag = "Flights")]
#[put("/flights/<flight_id>/status", format = "json", data = "<request>")]
pub async fn update_flight_status(
    flight_id: i32,
    request: Json<FlightStatusUpdate>,
    auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightDetail>, AppError> {
    if !auth.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    let flight = flight_service
        .update_status(flight_id, request.into_inner())
        .await?;
    Ok(Json(flight))
}
