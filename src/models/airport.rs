use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Airport {
    pub airport_code: String,
    pub airport_name: String,
    pub city: String,
    pub country: String,
    pub longitude: f64,
    pub latitude: f64,
    pub timezone: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AirportListResponse {
    pub airports: Vec<Airport>,
}
