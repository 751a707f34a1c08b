pub mod airplane;
pub mod airport;
pub mod booking;
pub mod flight;
pub mod payment;
pub mod route;
pub mod user;
