pub mod airport_service;
pub mod booking_service;
pub mod flight_service;
pub mod payment_service;
pub mod user_service;
