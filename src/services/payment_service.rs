use crate::models::booking::Booking;
use crate::models::payment::{
    Payment, PaymentConfirmation, PaymentMethod, PaymentPage, PaymentStatus,
};
use crate::services::booking_service::BookingService;
use crate::utils::error::{inserted_id, AppError, AppResult};
use chrono::{SubsecRound, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentService {
    pool: MySqlPool,
    booking_service: BookingService,
}

impl PaymentService {
    pub fn new(pool: MySqlPool, booking_service: BookingService) -> Self {
        PaymentService {
            pool,
            booking_service,
        }
    }

    // What the payment step shows before the user confirms
    pub async fn payment_page(&self, user_id: i32, book_ref: &str) -> AppResult<PaymentPage> {
        let booking = self.booking_service.get_booking(user_id, book_ref).await?;
        let payment = self.get_payment(&booking.book_ref).await?;

        Ok(PaymentPage {
            amount_due: if booking.is_paid {
                rust_decimal::Decimal::ZERO
            } else {
                booking.total_amount
            },
            confirm_url: format!("/api/payments/{}/confirm", booking.book_ref),
            booking,
            payment,
        })
    }

    /// Mark the booking paid and record a payment for it.
    ///
    /// Confirming an already paid booking changes nothing and reports
    /// `AlreadyPaid`. The booking row is locked while checking `is_paid`, so
    /// concurrent confirmations record exactly one payment.
    pub async fn confirm_payment(
        &self,
        user_id: i32,
        book_ref: &str,
        payment_method: PaymentMethod,
    ) -> AppResult<PaymentConfirmation> {
        let book_ref = book_ref.trim().to_uppercase();
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT book_ref, book_date, total_amount, user_id, is_paid
            FROM bookings
            WHERE book_ref = ? AND user_id = ?
            FOR UPDATE
            "#,
        )
        .bind(&book_ref)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if booking.is_paid {
            tx.rollback().await?;
            tracing::info!(book_ref = %booking.book_ref, "booking already paid");
            return Ok(PaymentConfirmation {
                book_ref: booking.book_ref,
                status: PaymentStatus::AlreadyPaid,
                message: "This booking has already been paid".to_string(),
                payment: None,
            });
        }

        sqlx::query("UPDATE bookings SET is_paid = TRUE WHERE book_ref = ?")
            .bind(&booking.book_ref)
            .execute(&mut *tx)
            .await?;

        let payment_date = Utc::now().naive_utc().trunc_subsecs(0);
        let reference = Uuid::new_v4().to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO payments (book_ref, amount, payment_method, payment_date, reference)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&booking.book_ref)
        .bind(booking.total_amount)
        .bind(payment_method.as_ref())
        .bind(payment_date)
        .bind(&reference)
        .execute(&mut *tx)
        .await?;
        let payment_id = inserted_id(&result)?;

        tx.commit().await?;

        let payment = Payment {
            payment_id,
            book_ref: booking.book_ref.clone(),
            amount: booking.total_amount,
            payment_method,
            payment_date,
            reference,
        };

        tracing::info!(
            book_ref = %payment.book_ref,
            amount = %payment.amount,
            method = %payment.payment_method,
            "payment recorded"
        );

        Ok(PaymentConfirmation {
            book_ref: booking.book_ref,
            status: PaymentStatus::Paid,
            message: "Payment successful".to_string(),
            payment: Some(payment),
        })
    }

    pub async fn get_payment(&self, book_ref: &str) -> AppResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT payment_id, book_ref, amount, payment_method, payment_date, reference
            FROM payments
            WHERE book_ref = ?
            "#,
        )
        .bind(book_ref.trim().to_uppercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }
}
