use crate::models::airplane::Airplane;
use crate::models::airport::{Airport, AirportListResponse};
use crate::models::route::{Route, RouteDetail};
use crate::utils::error::{AppError, AppResult};
use chrono::Utc;
use sqlx::MySqlPool;

// How far ahead route details list operating dates
const OPERATING_DATES_WINDOW_DAYS: u64 = 14;

#[derive(Clone)]
pub struct AirportService {
    pool: MySqlPool,
}

impl AirportService {
    pub fn new(pool: MySqlPool) -> Self {
        AirportService { pool }
    }

    pub async fn list_airports(&self) -> AppResult<AirportListResponse> {
        let airports = sqlx::query_as::<_, Airport>(
            r#"
            SELECT airport_code, airport_name, city, country, longitude, latitude, timezone
            FROM airports
            ORDER BY airport_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(AirportListResponse { airports })
    }

    pub async fn get_airport(&self, airport_code: &str) -> AppResult<Airport> {
        sqlx::query_as::<_, Airport>(
            r#"
            SELECT airport_code, airport_name, city, country, longitude, latitude, timezone
            FROM airports
            WHERE airport_code = ?
            "#,
        )
        .bind(airport_code.trim().to_uppercase())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Airport {} not found", airport_code)))
    }

    pub async fn get_route(&self, route_no: &str) -> AppResult<RouteDetail> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            SELECT route_no, departure_airport, arrival_airport, airplane_code, days_of_week,
                scheduled_time, duration_minutes, validity_from, validity_to
            FROM routes
            WHERE route_no = ?
            "#,
        )
        .bind(route_no.trim().to_uppercase())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Route {} not found", route_no)))?;

        let airplane = sqlx::query_as::<_, Airplane>(
            r#"
            SELECT airplane_code, model, range_km, speed_kmh
            FROM airplanes
            WHERE airplane_code = ?
            "#,
        )
        .bind(&route.airplane_code)
        .fetch_one(&self.pool)
        .await?;

        let departure = self.get_airport(&route.departure_airport).await?;
        let arrival = self.get_airport(&route.arrival_airport).await?;
        let today = Utc::now().date_naive();

        Ok(RouteDetail {
            operating_days: route
                .days_of_week
                .days()
                .iter()
                .map(|day| day.to_string())
                .collect(),
            next_operating_dates: route.operating_dates(today, OPERATING_DATES_WINDOW_DAYS),
            route_no: route.route_no,
            departure,
            arrival,
            airplane,
            scheduled_time: route.scheduled_time,
            duration_minutes: route.duration_minutes,
            validity_from: route.validity_from,
            validity_to: route.validity_to,
        })
    }
}
