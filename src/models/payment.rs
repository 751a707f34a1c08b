use crate::models::booking::BookingSummary;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Payment {
    pub payment_id: i32,
    pub book_ref: String,
    pub amount: Decimal,
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    pub payment_date: NaiveDateTime,
    pub reference: String,
}

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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Cash,
    BankTransfer,
}

impl TryFrom<String> for PaymentMethod {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PaymentRequest {
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    AlreadyPaid,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PaymentConfirmation {
    pub book_ref: String,
    pub status: PaymentStatus,
    pub message: String,
    /// Only present on the call that recorded the payment
    pub payment: Option<Payment>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PaymentPage {
    pub booking: BookingSummary,
    pub amount_due: Decimal,
    pub confirm_url: String,
    /// Recorded payment, once the booking is paid
    pub payment: Option<Payment>,
}
