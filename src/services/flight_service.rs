use crate::models::airplane::{AvailableSeatsResponse, Seat};
use crate::models::flight::{
    Flight, FlightDetail, FlightExport, FlightSearchQuery, FlightSearchResponse, FlightStatus,
    FlightStatusUpdate,
};
use crate::utils::error::{AppError, AppResult};
use chrono::{NaiveDateTime, SubsecRound, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder};

const FLIGHT_DETAIL_SELECT: &str = r#"
    SELECT
        f.flight_id,
        f.route_no,
        r.departure_airport,
        dep.city AS departure_city,
        r.arrival_airport,
        arr.city AS arrival_city,
        r.airplane_code,
        a.model AS airplane_model,
        f.scheduled_departure,
        f.scheduled_arrival,
        f.actual_departure,
        f.actual_arrival,
        f.status
    FROM flights f
    JOIN routes r ON f.route_no = r.route_no
    JOIN airports dep ON r.departure_airport = dep.airport_code
    JOIN airports arr ON r.arrival_airport = arr.airport_code
    JOIN airplanes a ON r.airplane_code = a.airplane_code
"#;

#[derive(Clone)]
pub struct FlightService {
    pool: MySqlPool,
    export_limit: i64,
}

impl FlightService {
    pub fn new(pool: MySqlPool, export_limit: i64) -> Self {
        FlightService { pool, export_limit }
    }

    // Search flights by departure/arrival (airport code or city) and date
    pub async fn search_flights(
        &self,
        search_query: FlightSearchQuery,
    ) -> AppResult<FlightSearchResponse> {
        let mut query = QueryBuilder::<MySql>::new(FLIGHT_DETAIL_SELECT);
        query.push(" WHERE 1 = 1");

        if let Some(departure) = non_blank(search_query.departure) {
            let pattern = like_pattern(&departure);
            query
                .push(" AND (LOWER(r.departure_airport) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(dep.city) LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(arrival) = non_blank(search_query.arrival) {
            let pattern = like_pattern(&arrival);
            query
                .push(" AND (LOWER(r.arrival_airport) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(arr.city) LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(date) = search_query.date {
            query
                .push(" AND DATE(f.scheduled_departure) = ")
                .push_bind(date);
        }

        query.push(" ORDER BY f.scheduled_departure, f.flight_id");

        let flights = query
            .build_query_as::<FlightDetail>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(results = flights.len(), "flight search");
        Ok(FlightSearchResponse { flights })
    }

    pub async fn get_flight(&self, flight_id: i32) -> AppResult<FlightDetail> {
        let sql = format!("{FLIGHT_DETAIL_SELECT} WHERE f.flight_id = ?");
        sqlx::query_as::<_, FlightDetail>(&sql)
            .bind(flight_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Flight not found".into()))
    }

    // Seats on the flight's airplane without a boarding pass for this flight
    pub async fn get_available_seats(&self, flight_id: i32) -> AppResult<AvailableSeatsResponse> {
        // Make sure the flight exists before listing its seats
        self.get_flight(flight_id).await?;

        let available_seats = sqlx::query_as::<_, Seat>(
            r#"
            SELECT s.airplane_code, s.seat_no, s.fare_conditions
            FROM flights f
            JOIN routes r ON f.route_no = r.route_no
            JOIN seats s ON s.airplane_code = r.airplane_code
            WHERE f.flight_id = ?
            AND NOT EXISTS (
                SELECT 1 FROM boarding_passes bp
                WHERE bp.flight_id = f.flight_id AND bp.seat_no = s.seat_no
            )
            ORDER BY s.seat_no
            "#,
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(AvailableSeatsResponse {
            flight_id,
            available_seats,
        })
    }

    pub async fn update_status(
        &self,
        flight_id: i32,
        update: FlightStatusUpdate,
    ) -> AppResult<FlightDetail> {
        let mut tx = self.pool.begin().await?;

        let mut flight = sqlx::query_as::<_, Flight>(
            r#"
            SELECT flight_id, route_no, status, scheduled_departure, scheduled_arrival,
                actual_departure, actual_arrival
            FROM flights WHERE flight_id = ? FOR UPDATE
            "#,
        )
        .bind(flight_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".into()))?;

        flight.status = update.status;
        if update.actual_departure.is_some() {
            flight.actual_departure = update.actual_departure;
        }
        if update.actual_arrival.is_some() {
            flight.actual_arrival = update.actual_arrival;
        }
        flight.check_times().map_err(AppError::ValidationError)?;

        sqlx::query(
            r#"
            UPDATE flights
            SET status = ?, actual_departure = ?, actual_arrival = ?
            WHERE flight_id = ?
            "#,
        )
        .bind(flight.status.as_ref())
        .bind(flight.actual_departure)
        .bind(flight.actual_arrival)
        .bind(flight.flight_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(flight_id, status = %flight.status, "flight status updated");
        self.get_flight(flight_id).await
    }

    pub async fn export_flights(&self) -> AppResult<FlightExport> {
        let mut query = QueryBuilder::<MySql>::new(FLIGHT_DETAIL_SELECT);
        query
            .push(" ORDER BY f.scheduled_departure, f.flight_id LIMIT ")
            .push_bind(self.export_limit);

        let flights = query
            .build_query_as::<FlightDetail>()
            .fetch_all(&self.pool)
            .await?;

        Ok(export_of(flights))
    }

    // Flights still ahead of us that have not been cancelled or flown
    pub async fn export_upcoming_flights(&self) -> AppResult<FlightExport> {
        let now = Utc::now().naive_utc();

        let mut query = QueryBuilder::<MySql>::new(FLIGHT_DETAIL_SELECT);
        query
            .push(" WHERE f.scheduled_departure > ")
            .push_bind(now)
            .push(" AND f.status IN (");
        let mut statuses = query.separated(", ");
        for status in FlightStatus::BOOKABLE {
            statuses.push_bind(status.to_string());
        }
        statuses.push_unseparated(")");
        query
            .push(" ORDER BY f.scheduled_departure, f.flight_id LIMIT ")
            .push_bind(self.export_limit);

        let flights = query
            .build_query_as::<FlightDetail>()
            .fetch_all(&self.pool)
            .await?;

        Ok(export_of(flights))
    }
}

fn export_of(flights: Vec<FlightDetail>) -> FlightExport {
    let generated_at: NaiveDateTime = Utc::now().naive_utc().trunc_subsecs(0);
    tracing::info!(count = flights.len(), "flights exported");
    FlightExport {
        generated_at,
        count: flights.len(),
        flights,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lowercased `%term%` pattern with LIKE wildcards in the term escaped.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
