pub mod airport_route;
pub mod booking_route;
pub mod export_route;
pub mod flight_route;
pub mod payment_route;
pub mod user_route;
