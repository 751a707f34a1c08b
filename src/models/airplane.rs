use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Airplane {
    pub airplane_code: String,
    pub model: String,
    pub range_km: i32,
    pub speed_kmh: i32,
}

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Seat {
    pub airplane_code: String,
    pub seat_no: String,
    #[sqlx(try_from = "String")]
    pub fare_conditions: FareClass,
}

// Fare Class Enum, stored as its display name
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum FareClass {
    Economy,
    Comfort,
    Business,
}

impl FareClass {
    pub fn multiplier(self) -> Decimal {
        match self {
            FareClass::Economy => Decimal::ONE,
            FareClass::Comfort => Decimal::new(15, 1),
            FareClass::Business => Decimal::from(3),
        }
    }

    /// Flat fare for this class; there is no per-route pricing.
    pub fn price(self, base_fare: Decimal) -> Decimal {
        (base_fare * self.multiplier())
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl TryFrom<String> for FareClass {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AvailableSeatsResponse {
    pub flight_id: i32,
    pub available_seats: Vec<Seat>,
}
