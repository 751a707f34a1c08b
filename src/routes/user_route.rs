use crate::models::user::{
    RegisterResponse, UserLoginRequest, UserLoginResponse, UserRegistrationRequest,
};
use crate::services::user_service::UserService;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Create an account
///
/// Usernames are 3 to 50 characters and unique; passwords need at least 8.
#[openapi(tag = "Account")]
#[post("/register", format = "json", data = "<request>")]
pub async fn register_account(
    request: Json<UserRegistrationRequest>,
    user_service: &State<UserService>,
) -> Result<Json<RegisterResponse>, AppError> {
    Ok(Json(user_service.register_user(request.into_inner()).await?))
}

/// Exchange credentials for a bearer token
///
/// Send the token as `Authorization: Bearer <token>` to book, pay and view
/// the booking history.
#[openapi(tag = "Account")]
#[post("/login", format = "json", data = "<request>")]
pub async fn issue_token(
    request: Json<UserLoginRequest>,
    user_service: &State<UserService>,
) -> Result<Json<UserLoginResponse>, AppError> {
    Ok(Json(user_service.login_user(request.into_inner()).await?))
}
