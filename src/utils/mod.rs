pub mod error;
pub mod generator;
pub mod jwt;
pub mod swagger_doc;
