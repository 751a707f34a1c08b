#[macro_use]
extern crate rocket;

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::utils::swagger_doc::swagger_ui;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::make_swagger_ui;
use services::airport_service::AirportService;
use services::booking_service::BookingService;
use services::flight_service::FlightService;
use services::payment_service::PaymentService;
use services::user_service::UserService;
use sqlx::MySqlPool;

/// Assemble the HTTP application around an existing connection pool.
pub fn build_rocket(config: AppConfig, pool: MySqlPool) -> Rocket<Build> {
    let user_service = UserService::new(pool.clone(), config.jwt_secret.clone());
    let airport_service = AirportService::new(pool.clone());
    let flight_service = FlightService::new(pool.clone(), config.export_limit);
    let booking_service =
        BookingService::new(pool.clone(), config.base_fare, config.boarding_offset_minutes);
    let payment_service = PaymentService::new(pool, booking_service.clone());

    rocket::build()
        .manage(config)
        .manage(user_service)
        .manage(airport_service)
        .manage(flight_service)
        .manage(booking_service)
        .manage(payment_service)
        .mount(
            "/api",
            openapi_get_routes![
                routes::user_route::register_account,
                routes::user_route::issue_token,
                routes::airport_route::list_airports,
                routes::airport_route::get_airport,
                routes::airport_route::get_route,
                routes::flight_route::search_flights,
                routes::flight_route::get_flight,
                routes::flight_route::get_available_seats,
                routes::flight_route::update_flight_status,
                routes::booking_route::book_flight,
                routes::booking_route::booking_history,
                routes::payment_route::payment_page,
                routes::payment_route::confirm_payment,
                routes::export_route::export_flights,
                routes::export_route::export_upcoming_flights,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
