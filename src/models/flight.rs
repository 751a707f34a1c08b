use chrono::{NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Flight {
    pub flight_id: i32,
    pub route_no: String,
    #[sqlx(try_from = "String")]
    pub status: FlightStatus,
    pub scheduled_departure: NaiveDateTime,
    pub scheduled_arrival: NaiveDateTime,
    pub actual_departure: Option<NaiveDateTime>,
    pub actual_arrival: Option<NaiveDateTime>,
}

impl Flight {
    pub fn check_times(&self) -> Result<(), String> {
        check_flight_times(
            self.scheduled_departure,
            self.scheduled_arrival,
            self.actual_departure,
            self.actual_arrival,
        )
    }
}

/// Arrival must come strictly after departure, for both the schedule and the
/// actual times when both are known.
pub fn check_flight_times(
    scheduled_departure: NaiveDateTime,
    scheduled_arrival: NaiveDateTime,
    actual_departure: Option<NaiveDateTime>,
    actual_arrival: Option<NaiveDateTime>,
) -> Result<(), String> {
    if scheduled_arrival <= scheduled_departure {
        return Err("scheduled arrival must be after scheduled departure".into());
    }
    if let (Some(departure), Some(arrival)) = (actual_departure, actual_arrival) {
        if arrival <= departure {
            return Err("actual arrival must be after actual departure".into());
        }
    }
    Ok(())
}

// Flight Status Enum, stored as its display name
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum FlightStatus {
    Scheduled,
    #[serde(rename = "On Time")]
    #[strum(serialize = "On Time")]
    OnTime,
    Delayed,
    Boarding,
    Departed,
    Arrived,
    Cancelled,
}

impl FlightStatus {
    /// Statuses that still accept new bookings.
    pub const BOOKABLE: [FlightStatus; 4] = [
        FlightStatus::Scheduled,
        FlightStatus::OnTime,
        FlightStatus::Delayed,
        FlightStatus::Boarding,
    ];

    pub fn is_bookable(self) -> bool {
        Self::BOOKABLE.contains(&self)
    }
}

impl TryFrom<String> for FlightStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Default, Clone, Deserialize, JsonSchema)]
pub struct FlightSearchQuery {
    /// Airport code or city, substring match
    pub departure: Option<String>,
    /// Airport code or city, substring match
    pub arrival: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct FlightSearchResponse {
    pub flights: Vec<FlightDetail>,
}

// Single flight joined with its route, airports and airplane
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct FlightDetail {
    pub flight_id: i32,
    pub route_no: String,
    pub departure_airport: String,
    pub departure_city: String,
    pub arrival_airport: String,
    pub arrival_city: String,
    pub airplane_code: String,
    pub airplane_model: String,
    pub scheduled_departure: NaiveDateTime,
    pub scheduled_arrival: NaiveDateTime,
    pub actual_departure: Option<NaiveDateTime>,
    pub actual_arrival: Option<NaiveDateTime>,
    #[sqlx(try_from = "String")]
    pub status: FlightStatus,
}

/// New status for a flight. An omitted or null actual time keeps the stored
/// value; actual times can be corrected but not cleared.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FlightStatusUpdate {
    pub status: FlightStatus,
    pub actual_departure: Option<NaiveDateTime>,
    pub actual_arrival: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct FlightExport {
    pub generated_at: NaiveDateTime,
    pub count: usize,
    pub flights: Vec<FlightDetail>,
}
