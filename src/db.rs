use crate::config::AppConfig;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

/// Table definitions, in foreign-key order.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INT AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(50) NOT NULL,
        password VARCHAR(255) NOT NULL,
        role VARCHAR(16) NOT NULL DEFAULT 'USER',
        CONSTRAINT users_username_uindex UNIQUE (username)
    )",
    "CREATE TABLE IF NOT EXISTS airplanes (
        airplane_code VARCHAR(10) NOT NULL PRIMARY KEY,
        model VARCHAR(100) NOT NULL,
        range_km INT NOT NULL,
        speed_kmh INT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS airports (
        airport_code CHAR(3) NOT NULL PRIMARY KEY,
        airport_name VARCHAR(255) NOT NULL,
        city VARCHAR(255) NOT NULL,
        country VARCHAR(255) NOT NULL,
        longitude DOUBLE NOT NULL,
        latitude DOUBLE NOT NULL,
        timezone VARCHAR(64) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS seats (
        airplane_code VARCHAR(10) NOT NULL,
        seat_no VARCHAR(4) NOT NULL,
        fare_conditions VARCHAR(10) NOT NULL,
        PRIMARY KEY (airplane_code, seat_no),
        CONSTRAINT seats_airplane_fk
            FOREIGN KEY (airplane_code) REFERENCES airplanes(airplane_code)
            ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS routes (
        route_no VARCHAR(6) NOT NULL PRIMARY KEY,
        departure_airport CHAR(3) NOT NULL,
        arrival_airport CHAR(3) NOT NULL,
        airplane_code VARCHAR(10) NOT NULL,
        days_of_week INT NOT NULL DEFAULT 127,
        scheduled_time TIME NOT NULL,
        duration_minutes INT NOT NULL,
        validity_from DATE NOT NULL,
        validity_to DATE NULL,
        CONSTRAINT routes_departure_fk
            FOREIGN KEY (departure_airport) REFERENCES airports(airport_code),
        CONSTRAINT routes_arrival_fk
            FOREIGN KEY (arrival_airport) REFERENCES airports(airport_code),
        CONSTRAINT routes_airplane_fk
            FOREIGN KEY (airplane_code) REFERENCES airplanes(airplane_code)
    )",
    "CREATE TABLE IF NOT EXISTS flights (
        flight_id INT AUTO_INCREMENT PRIMARY KEY,
        route_no VARCHAR(6) NOT NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'Scheduled',
        scheduled_departure DATETIME NOT NULL,
        scheduled_arrival DATETIME NOT NULL,
        actual_departure DATETIME NULL,
        actual_arrival DATETIME NULL,
        CONSTRAINT flights_route_fk
            FOREIGN KEY (route_no) REFERENCES routes(route_no),
        CONSTRAINT flights_scheduled_check
            CHECK (scheduled_arrival > scheduled_departure),
        CONSTRAINT flights_actual_check
            CHECK (actual_arrival IS NULL OR actual_departure IS NULL
                OR actual_arrival > actual_departure)
    )",
    "CREATE TABLE IF NOT EXISTS bookings (
        book_ref CHAR(6) NOT NULL PRIMARY KEY,
        book_date DATETIME NOT NULL,
        total_amount DECIMAL(10,2) NOT NULL,
        user_id INT NOT NULL,
        is_paid BOOLEAN NOT NULL DEFAULT FALSE,
        CONSTRAINT bookings_user_fk
            FOREIGN KEY (user_id) REFERENCES users(id)
    )",
    "CREATE TABLE IF NOT EXISTS tickets (
        ticket_no CHAR(13) NOT NULL PRIMARY KEY,
        book_ref CHAR(6) NOT NULL,
        passenger_id VARCHAR(20) NOT NULL,
        passenger_name VARCHAR(100) NOT NULL,
        CONSTRAINT tickets_booking_fk
            FOREIGN KEY (book_ref) REFERENCES bookings(book_ref)
            ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS segments (
        ticket_no CHAR(13) NOT NULL,
        flight_id INT NOT NULL,
        fare_conditions VARCHAR(10) NOT NULL,
        price DECIMAL(10,2) NOT NULL,
        PRIMARY KEY (ticket_no, flight_id),
        CONSTRAINT segments_ticket_fk
            FOREIGN KEY (ticket_no) REFERENCES tickets(ticket_no)
            ON DELETE CASCADE,
        CONSTRAINT segments_flight_fk
            FOREIGN KEY (flight_id) REFERENCES flights(flight_id)
    )",
    "CREATE TABLE IF NOT EXISTS boarding_passes (
        ticket_no CHAR(13) NOT NULL,
        flight_id INT NOT NULL,
        seat_no VARCHAR(4) NOT NULL,
        boarding_no INT NOT NULL,
        boarding_time DATETIME NOT NULL,
        PRIMARY KEY (ticket_no, flight_id),
        CONSTRAINT boarding_passes_flight_seat_uindex UNIQUE (flight_id, seat_no),
        CONSTRAINT boarding_passes_flight_boarding_no_uindex UNIQUE (flight_id, boarding_no),
        CONSTRAINT boarding_passes_segment_fk
            FOREIGN KEY (ticket_no, flight_id) REFERENCES segments(ticket_no, flight_id)
            ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS payments (
        payment_id INT AUTO_INCREMENT PRIMARY KEY,
        book_ref CHAR(6) NOT NULL,
        amount DECIMAL(10,2) NOT NULL,
        payment_method VARCHAR(20) NOT NULL,
        payment_date DATETIME NOT NULL,
        reference CHAR(36) NOT NULL,
        CONSTRAINT payments_book_ref_uindex UNIQUE (book_ref),
        CONSTRAINT payments_booking_fk
            FOREIGN KEY (book_ref) REFERENCES bookings(book_ref)
    )",
];

// Database connection manager
pub struct Database {
    pub pool: MySqlPool,
}

impl Database {
    // Create a new database connection pool
    pub async fn connect(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        create_tables(&self.pool).await
    }
}

pub async fn create_tables(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for create_sql in SCHEMA {
        sqlx::query(create_sql).execute(pool).await?;
    }
    tracing::info!(tables = SCHEMA.len(), "schema is up to date");
    Ok(())
}
