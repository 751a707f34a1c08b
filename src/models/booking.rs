use crate::models::airplane::FareClass;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Booking {
    pub book_ref: String,
    pub book_date: NaiveDateTime,
    pub total_amount: Decimal,
    #[serde(skip)]
    pub user_id: i32,
    pub is_paid: bool,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Ticket {
    pub ticket_no: String,
    pub book_ref: String,
    pub passenger_id: String,
    pub passenger_name: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Segment {
    pub ticket_no: String,
    pub flight_id: i32,
    pub fare_conditions: FareClass,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BoardingPass {
    pub ticket_no: String,
    pub flight_id: i32,
    pub seat_no: String,
    pub boarding_no: i32,
    pub boarding_time: NaiveDateTime,
}

/// Passenger fields are stored trimmed, so they are checked trimmed too.
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct BookingRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub passenger_name: String,
    /// Passport or other identity document number
    #[validate(length(min = 1, max = 20), custom(function = "not_blank"))]
    pub passenger_id: String,
    pub fare_conditions: FareClass,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingResponse {
    pub booking: Booking,
    pub ticket: Ticket,
    pub segment: Segment,
    /// Absent when no seat of the requested class was free
    pub boarding_pass: Option<BoardingPass>,
    /// Where the client continues to pay for the booking
    pub payment_url: String,
}

// One ticketed segment of a booking, as shown on the payment page and in the profile
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct TicketDetail {
    #[serde(skip)]
    pub book_ref: String,
    pub ticket_no: String,
    pub passenger_name: String,
    pub passenger_id: String,
    pub flight_id: i32,
    pub route_no: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub scheduled_departure: NaiveDateTime,
    #[sqlx(try_from = "String")]
    pub fare_conditions: FareClass,
    pub price: Decimal,
    pub seat_no: Option<String>,
    pub boarding_no: Option<i32>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BookingSummary {
    pub book_ref: String,
    pub book_date: NaiveDateTime,
    pub total_amount: Decimal,
    pub is_paid: bool,
    pub tickets: Vec<TicketDetail>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingHistoryResponse {
    pub bookings: Vec<BookingSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_request_checks_passenger_fields() {
        let request: BookingRequest = serde_json::from_str(
            r#"{
                "passenger_name": "IVAN PETROV",
                "passenger_id": "4510 123456",
                "fare_conditions": "Comfort"
            }"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.fare_conditions, FareClass::Comfort);

        let blank_name = BookingRequest {
            passenger_name: String::new(),
            ..request.clone()
        };
        assert!(blank_name.validate().is_err());

        let long_id = BookingRequest {
            passenger_id: "9".repeat(21),
            ..request
        };
        assert!(long_id.validate().is_err());
    }

    #[test]
    fn whitespace_only_passenger_fields_are_rejected() {
        let request: BookingRequest = serde_json::from_str(
            r#"{"passenger_name": "   ", "passenger_id": "  ", "fare_conditions": "Economy"}"#,
        )
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("passenger_name"));
        assert!(fields.contains_key("passenger_id"));

        let padded = BookingRequest {
            passenger_name: "  ANNA IVANOVA ".into(),
            passenger_id: " 1234 567890".into(),
            ..request
        };
        assert!(padded.validate().is_ok());
    }
}
