use crate::models::airplane::FareClass;
use crate::models::booking::{
    BoardingPass, Booking, BookingHistoryResponse, BookingRequest, BookingResponse,
    BookingSummary, Segment, Ticket, TicketDetail,
};
use crate::models::flight::FlightStatus;
use crate::utils::error::{AppError, AppResult};
use crate::utils::generator;
use chrono::{Duration, NaiveDateTime, SubsecRound, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlConnection, MySqlPool};
use validator::Validate;

// Attempts at drawing an unused booking reference / ticket number
const MAX_GENERATION_ATTEMPTS: usize = 5;

const TICKET_DETAIL_SELECT: &str = r#"
    SELECT
        t.book_ref,
        t.ticket_no,
        t.passenger_name,
        t.passenger_id,
        s.flight_id,
        f.route_no,
        r.departure_airport,
        r.arrival_airport,
        f.scheduled_departure,
        s.fare_conditions,
        s.price,
        bp.seat_no,
        bp.boarding_no
    FROM bookings b
    JOIN tickets t ON t.book_ref = b.book_ref
    JOIN segments s ON s.ticket_no = t.ticket_no
    JOIN flights f ON f.flight_id = s.flight_id
    JOIN routes r ON r.route_no = f.route_no
    LEFT JOIN boarding_passes bp
        ON bp.ticket_no = s.ticket_no AND bp.flight_id = s.flight_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct BookableFlight {
    flight_id: i32,
    #[sqlx(try_from = "String")]
    status: FlightStatus,
    scheduled_departure: NaiveDateTime,
    airplane_code: String,
}

#[derive(Clone)]
pub struct BookingService {
    pool: MySqlPool,
    base_fare: Decimal,
    boarding_offset: Duration,
}

impl BookingService {
    pub fn new(pool: MySqlPool, base_fare: Decimal, boarding_offset_minutes: i64) -> Self {
        BookingService {
            pool,
            base_fare,
            boarding_offset: Duration::minutes(boarding_offset_minutes),
        }
    }

    /// Book one passenger on a flight.
    ///
    /// Booking, ticket, segment and (when a seat of the requested class is
    /// free) boarding pass are written in a single transaction. The flight row
    /// stays locked until commit, so concurrent bookings on the same flight
    /// cannot pick the same seat.
    pub async fn book_flight(
        &self,
        user_id: i32,
        flight_id: i32,
        request: BookingRequest,
    ) -> AppResult<BookingResponse> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let flight = sqlx::query_as::<_, BookableFlight>(
            r#"
            SELECT f.flight_id, f.status, f.scheduled_departure, r.airplane_code
            FROM flights f
            JOIN routes r ON f.route_no = r.route_no
            WHERE f.flight_id = ?
            FOR UPDATE OF f
            "#,
        )
        .bind(flight_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".into()))?;

        if !flight.status.is_bookable() {
            return Err(AppError::Unprocessable(format!(
                "Flight {} is {} and can no longer be booked",
                flight.flight_id, flight.status
            )));
        }

        let now = Utc::now().naive_utc().trunc_subsecs(0);
        let price = request.fare_conditions.price(self.base_fare);

        let book_ref = unused_value(
            &mut tx,
            generator::booking_reference,
            "SELECT book_ref FROM bookings WHERE book_ref = ?",
        )
        .await?;

        sqlx::query(
            r#"
            INSERT INTO bookings (book_ref, book_date, total_amount, user_id, is_paid)
            VALUES (?, ?, 0, ?, FALSE)
            "#,
        )
        .bind(&book_ref)
        .bind(now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let ticket_no = unused_value(
            &mut tx,
            generator::ticket_number,
            "SELECT ticket_no FROM tickets WHERE ticket_no = ?",
        )
        .await?;

        let ticket = Ticket {
            ticket_no,
            book_ref: book_ref.clone(),
            passenger_id: request.passenger_id.trim().to_string(),
            passenger_name: request.passenger_name.trim().to_string(),
        };

        sqlx::query(
            r#"
            INSERT INTO tickets (ticket_no, book_ref, passenger_id, passenger_name)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&ticket.ticket_no)
        .bind(&ticket.book_ref)
        .bind(&ticket.passenger_id)
        .bind(&ticket.passenger_name)
        .execute(&mut *tx)
        .await?;

        let segment = Segment {
            ticket_no: ticket.ticket_no.clone(),
            flight_id: flight.flight_id,
            fare_conditions: request.fare_conditions,
            price,
        };

        sqlx::query(
            r#"
            INSERT INTO segments (ticket_no, flight_id, fare_conditions, price)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&segment.ticket_no)
        .bind(segment.flight_id)
        .bind(segment.fare_conditions.as_ref())
        .bind(segment.price)
        .execute(&mut *tx)
        .await?;

        let boarding_pass = self
            .assign_seat(&mut *tx, &flight, &ticket.ticket_no, request.fare_conditions)
            .await?;

        // The booking total is whatever its segments add up to
        sqlx::query(
            r#"
            UPDATE bookings
            SET total_amount = (
                SELECT COALESCE(SUM(s.price), 0)
                FROM segments s
                JOIN tickets t ON t.ticket_no = s.ticket_no
                WHERE t.book_ref = ?
            )
            WHERE book_ref = ?
            "#,
        )
        .bind(&book_ref)
        .bind(&book_ref)
        .execute(&mut *tx)
        .await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT book_ref, book_date, total_amount, user_id, is_paid
            FROM bookings
            WHERE book_ref = ?
            "#,
        )
        .bind(&book_ref)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            book_ref = %booking.book_ref,
            ticket_no = %ticket.ticket_no,
            flight_id = flight.flight_id,
            fare = %segment.fare_conditions,
            seat = boarding_pass.as_ref().map(|bp| bp.seat_no.as_str()).unwrap_or("none"),
            "booking created"
        );

        Ok(BookingResponse {
            payment_url: format!("/api/payments/{}", booking.book_ref),
            booking,
            ticket,
            segment,
            boarding_pass,
        })
    }

    // Random free seat of the fare class; None when the class is full
    async fn assign_seat(
        &self,
        conn: &mut MySqlConnection,
        flight: &BookableFlight,
        ticket_no: &str,
        fare_conditions: FareClass,
    ) -> AppResult<Option<BoardingPass>> {
        let free_seats: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT s.seat_no
            FROM seats s
            WHERE s.airplane_code = ?
            AND s.fare_conditions = ?
            AND NOT EXISTS (
                SELECT 1 FROM boarding_passes bp
                WHERE bp.flight_id = ? AND bp.seat_no = s.seat_no
            )
            "#,
        )
        .bind(&flight.airplane_code)
        .bind(fare_conditions.as_ref())
        .bind(flight.flight_id)
        .fetch_all(&mut *conn)
        .await?;

        let seat_no = match generator::pick(&free_seats) {
            Some(seat_no) => seat_no,
            None => {
                tracing::warn!(
                    flight_id = flight.flight_id,
                    fare = %fare_conditions,
                    "no free seat left, booking without boarding pass"
                );
                return Ok(None);
            }
        };

        let next_boarding_no: i64 = sqlx::query_scalar(
            r#"
            SELECT CAST(COALESCE(MAX(boarding_no), 0) + 1 AS SIGNED)
            FROM boarding_passes
            WHERE flight_id = ?
            "#,
        )
        .bind(flight.flight_id)
        .fetch_one(&mut *conn)
        .await?;

        let boarding_pass = BoardingPass {
            ticket_no: ticket_no.to_string(),
            flight_id: flight.flight_id,
            seat_no,
            boarding_no: i32::try_from(next_boarding_no)
                .map_err(|_| AppError::Conflict("Boarding numbers exhausted".into()))?,
            boarding_time: flight.scheduled_departure - self.boarding_offset,
        };

        sqlx::query(
            r#"
            INSERT INTO boarding_passes (ticket_no, flight_id, seat_no, boarding_no, boarding_time)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&boarding_pass.ticket_no)
        .bind(boarding_pass.flight_id)
        .bind(&boarding_pass.seat_no)
        .bind(boarding_pass.boarding_no)
        .bind(boarding_pass.boarding_time)
        .execute(&mut *conn)
        .await?;

        Ok(Some(boarding_pass))
    }

    pub async fn get_booking(&self, user_id: i32, book_ref: &str) -> AppResult<BookingSummary> {
        let book_ref = book_ref.trim().to_uppercase();

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT book_ref, book_date, total_amount, user_id, is_paid
            FROM bookings
            WHERE book_ref = ? AND user_id = ?
            "#,
        )
        .bind(&book_ref)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        let sql = format!("{TICKET_DETAIL_SELECT} WHERE b.book_ref = ? ORDER BY t.ticket_no");
        let tickets = sqlx::query_as::<_, TicketDetail>(&sql)
            .bind(&book_ref)
            .fetch_all(&self.pool)
            .await?;

        group_tickets(vec![booking], tickets)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    // All bookings of a user, newest first
    pub async fn get_history(&self, user_id: i32) -> AppResult<BookingHistoryResponse> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT book_ref, book_date, total_amount, user_id, is_paid
            FROM bookings
            WHERE user_id = ?
            ORDER BY book_date DESC, book_ref
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let sql = format!("{TICKET_DETAIL_SELECT} WHERE b.user_id = ? ORDER BY t.ticket_no");
        let tickets = sqlx::query_as::<_, TicketDetail>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(BookingHistoryResponse {
            bookings: group_tickets(bookings, tickets),
        })
    }
}

// Draw generated values until one is not yet present according to `exists_sql`
async fn unused_value(
    tx: &mut sqlx::Transaction<'_, MySql>,
    generate: fn() -> String,
    exists_sql: &str,
) -> AppResult<String> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let candidate = generate();
        let taken = sqlx::query(exists_sql)
            .bind(&candidate)
            .fetch_optional(&mut **tx)
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
        tracing::warn!(candidate = %candidate, "generated identifier already in use, retrying");
    }
    Err(AppError::Conflict(
        "Could not allocate a unique identifier, please retry".into(),
    ))
}

/// Attach ticket rows to their bookings, keeping the bookings' order.
fn group_tickets(bookings: Vec<Booking>, tickets: Vec<TicketDetail>) -> Vec<BookingSummary> {
    let mut summaries: IndexMap<String, BookingSummary> = bookings
        .into_iter()
        .map(|b| {
            (
                b.book_ref.clone(),
                BookingSummary {
                    book_ref: b.book_ref,
                    book_date: b.book_date,
                    total_amount: b.total_amount,
                    is_paid: b.is_paid,
                    tickets: Vec::new(),
                },
            )
        })
        .collect();

    for ticket in tickets {
        if let Some(summary) = summaries.get_mut(&ticket.book_ref) {
            summary.tickets.push(ticket);
        }
    }

    summaries.into_values().collect()
}
