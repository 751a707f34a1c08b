use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use ctor::dtor;
use flight_booking::{
    models::{airplane::FareClass, booking::BookingRequest, route::WeeklySchedule},
    services::booking_service::BookingService,
    utils::error::AppError,
};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool as Pool;
use std::collections::HashSet;
use test_context::{test_context, AsyncTestContext};
use tokio::task::JoinSet;

mod common {
    pub mod test_utils;
}
use common::test_utils::{self, TestDb};

struct BookingServiceContext {
    env: Option<BookingEnv>,
}

struct BookingEnv {
    pool: Pool,
    booking_service: BookingService,
}

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

#[async_trait]
impl AsyncTestContext for BookingServiceContext {
    async fn setup() -> Self {
        let pool = TestDb::get_instance(file!())
            .await
            .expect("Failed to get test database instance");

        BookingServiceContext {
            env: pool.map(|pool| BookingEnv {
                booking_service: BookingService::new(pool.clone(), Decimal::new(10000, 0), 40),
                pool,
            }),
        }
    }

    async fn teardown(self) {
        if let Some(env) = self.env {
            let _ = sqlx::query("SELECT 1").execute(&env.pool).await;
        }
    }
}

fn departure() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 5, 20)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

// One airplane, route and flight per test, keyed by `tag`
async fn setup_flight(
    env: &BookingEnv,
    tag: &str,
    seats: &[(&str, &str)],
    status: &str,
) -> Result<i32, AppError> {
    test_utils::insert_airplane(&env.pool, tag, seats).await?;
    test_utils::insert_route(&env.pool, tag, "DME", "LED", tag, WeeklySchedule::EVERY_DAY)
        .await?;
    Ok(test_utils::insert_flight(&env.pool, tag, departure(), status).await?)
}

fn request(fare_conditions: FareClass) -> BookingRequest {
    BookingRequest {
        passenger_name: "IVAN PETROV".to_string(),
        passenger_id: "4510 123456".to_string(),
        fare_conditions,
    }
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_book_flight_creates_all_records(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let Some(env) = &ctx.env else { return Ok(()) };

    let flight_id = setup_flight(
        env,
        "BK01",
        &[("1A", "Business"), ("2A", "Comfort"), ("10A", "Economy")],
        "Scheduled",
    )
    .await?;
    let user_id = test_utils::insert_user(&env.pool, "booker_01", "USER").await?;

    let response = env
        .booking_service
        .book_flight(user_id, flight_id, request(FareClass::Business))
        .await?;

    assert_eq!(response.booking.book_ref.len(), 6);
    assert_eq!(response.ticket.ticket_no.len(), 13);
    assert_eq!(response.segment.price, Decimal::new(30000, 0));
    assert_eq!(response.booking.total_amount, response.segment.price);
    assert!(!response.booking.is_paid);
    assert_eq!(
        response.payment_url,
        format!("/api/payments/{}", response.booking.book_ref)
    );

    let boarding_pass = response.boarding_pass.expect("a business seat was free");
    assert_eq!(boarding_pass.seat_no, "1A");
    assert_eq!(boarding_pass.boarding_no, 1);
    assert_eq!(
        boarding_pass.boarding_time,
        departure() - chrono::Duration::minutes(40)
    );

    let (segments,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM segments WHERE ticket_no = ?")
            .bind(&response.ticket.ticket_no)
            .fetch_one(&env.pool)
            .await?;
    assert_eq!(segments, 1);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_book_without_free_seat_has_no_boarding_pass(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let Some(env) = &ctx.env else { return Ok(()) };

    let flight_id = setup_flight(env, "BK02", &[("10A", "Economy")], "On Time").await?;
    let user_id = test_utils::insert_user(&env.pool, "booker_02", "USER").await?;

    // No comfort seats on this airplane at all
    let response = env
        .booking_service
        .book_flight(user_id, flight_id, request(FareClass::Comfort))
        .await?;

    assert!(response.boarding_pass.is_none());
    assert_eq!(response.segment.price, Decimal::new(15000, 0));

    let (passes,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM boarding_passes WHERE flight_id = ?")
            .bind(flight_id)
            .fetch_one(&env.pool)
            .await?;
    assert_eq!(passes, 0);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_concurrent_bookings_never_share_a_seat(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let Some(env) = &ctx.env else { return Ok(()) };

    let seats = [
        ("10A", "Economy"),
        ("10B", "Economy"),
        ("10C", "Economy"),
        ("11A", "Economy"),
    ];
    let flight_id = setup_flight(env, "BK03", &seats, "Scheduled").await?;
    let user_id = test_utils::insert_user(&env.pool, "booker_03", "USER").await?;

    let num_bookings = 8;
    let mut join_set = JoinSet::new();
    for _ in 0..num_bookings {
        let booking_service = env.booking_service.clone();
        join_set.spawn(async move {
            booking_service
                .book_flight(user_id, flight_id, request(FareClass::Economy))
                .await
        });
    }

    let mut assigned_seats = Vec::new();
    let mut without_seat = 0;
    while let Some(result) = join_set.join_next().await {
        let response = result.expect("booking task panicked")?;
        match response.boarding_pass {
            Some(pass) => assigned_seats.push(pass.seat_no),
            None => without_seat += 1,
        }
    }

    let distinct: HashSet<&String> = assigned_seats.iter().collect();
    assert_eq!(assigned_seats.len(), seats.len());
    assert_eq!(distinct.len(), seats.len(), "a seat was assigned twice");
    assert_eq!(without_seat, num_bookings - seats.len());

    let boarding_numbers: Vec<i32> = sqlx::query_scalar(
        "SELECT boarding_no FROM boarding_passes WHERE flight_id = ? ORDER BY boarding_no",
    )
    .bind(flight_id)
    .fetch_all(&env.pool)
    .await?;
    assert_eq!(boarding_numbers, vec![1, 2, 3, 4]);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_cannot_book_cancelled_or_missing_flight(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let Some(env) = &ctx.env else { return Ok(()) };

    let flight_id = setup_flight(env, "BK04", &[("10A", "Economy")], "Cancelled").await?;
    let user_id = test_utils::insert_user(&env.pool, "booker_04", "USER").await?;

    let result = env
        .booking_service
        .book_flight(user_id, flight_id, request(FareClass::Economy))
        .await;
    assert!(matches!(result, Err(AppError::Unprocessable(_))));

    let result = env
        .booking_service
        .book_flight(user_id, 999_999, request(FareClass::Economy))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // Nothing was written for the rejected attempts
    let (bookings,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&env.pool)
        .await?;
    assert_eq!(bookings, 0);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_history_lists_bookings_with_tickets(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let Some(env) = &ctx.env else { return Ok(()) };

    let flight_id = setup_flight(env, "BK05", &[("10A", "Economy")], "Scheduled").await?;
    let user_id = test_utils::insert_user(&env.pool, "booker_05", "USER").await?;
    let other_user = test_utils::insert_user(&env.pool, "booker_05b", "USER").await?;

    let first = env
        .booking_service
        .book_flight(user_id, flight_id, request(FareClass::Economy))
        .await?;
    let second = env
        .booking_service
        .book_flight(user_id, flight_id, request(FareClass::Economy))
        .await?;
    env.booking_service
        .book_flight(other_user, flight_id, request(FareClass::Economy))
        .await?;

    let history = env.booking_service.get_history(user_id).await?;
    assert_eq!(history.bookings.len(), 2);

    let refs: HashSet<&str> = history.bookings.iter().map(|b| b.book_ref.as_str()).collect();
    assert!(refs.contains(first.booking.book_ref.as_str()));
    assert!(refs.contains(second.booking.book_ref.as_str()));

    for booking in &history.bookings {
        assert_eq!(booking.tickets.len(), 1);
        let ticket = &booking.tickets[0];
        assert_eq!(ticket.flight_id, flight_id);
        assert_eq!(ticket.departure_airport, "DME");
        assert_eq!(booking.total_amount, ticket.price);
    }

    // Only the owner can see a booking
    let result = env
        .booking_service
        .get_booking(other_user, &first.booking.book_ref)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let summary = env
        .booking_service
        .get_booking(user_id, &first.booking.book_ref.to_lowercase())
        .await?;
    assert_eq!(summary.book_ref, first.booking.book_ref);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_invalid_passenger_is_rejected_before_booking(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let Some(env) = &ctx.env else { return Ok(()) };

    let flight_id = setup_flight(env, "BK06", &[("10A", "Economy")], "Scheduled").await?;
    let user_id = test_utils::insert_user(&env.pool, "booker_06", "USER").await?;

    let mut bad_request = request(FareClass::Economy);
    bad_request.passenger_name = String::new();

    let result = env
        .booking_service
        .book_flight(user_id, flight_id, bad_request)
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));

    Ok(())
}
