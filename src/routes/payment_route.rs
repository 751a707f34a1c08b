use crate::models::payment::{PaymentConfirmation, PaymentPage, PaymentRequest};
use crate::services::payment_service::PaymentService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Booking details and amount due
#[openapi(tag = "Payments")]
#[get("/payments/<book_ref>")]
pub async fn payment_page(
    book_ref: String,
    auth: AuthenticatedUser,
    payment_service: &State<PaymentService>,
) -> Result<Json<PaymentPage>, AppError> {
    let page = payment_service.payment_page(auth.user_id, &book_ref).await?;
    Ok(Json(page))
}

/// Confirm payment for a booking
///
/// Repeating the call for a paid booking reports `already_paid` and records nothing.
#[openapi(tag = "Payments")]
#[post("/payments/<book_ref>/confirm", format = "json", data = "<request>")]
pub async fn confirm_payment(
    book_ref: String,
    request: Json<PaymentRequest>,
    auth: AuthenticatedUser,
    payment_service: &State<PaymentService>,
) -> Result<Json<PaymentConfirmation>, AppError> {
    let confirmation = payment_service
        .confirm_payment(auth.user_id, &book_ref, request.payment_method)
        .await?;
    Ok(Json(confirmation))
}
