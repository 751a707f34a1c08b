use crate::models::booking::{BookingHistoryResponse, BookingRequest, BookingResponse};
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Book a seat on a flight
///
/// Continue with the returned `payment_url` to pay for the booking.
#[openapi(tag = "Book")]
#[post("/flights/<flight_id>/book", format = "json", data = "<request>")]
pub async fn book_flight(
    flight_id: i32,
    request: Json<BookingRequest>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingResponse>, AppError> {
    let response = booking_service
        .book_flight(auth.user_id, flight_id, request.into_inner())
        .await?;

    Ok(Json(response))
}

/// Bookings of the logged-in user
#[openapi(tag = "Profile")]
#[get("/profile/bookings")]
pub async fn booking_history(
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingHistoryResponse>, AppError> {
    let history = booking_service.get_history(auth.user_id).await?;
    Ok(Json(history))
}
