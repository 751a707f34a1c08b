use dotenv::dotenv;
use flight_booking::config::AppConfig;
use flight_booking::db::Database;
use flight_booking::logging::init_logging;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;

    // Connect to the database
    let database = Database::connect(&config).await?;
    if config.auto_migrate {
        database.migrate().await?;
    }
    tracing::info!(
        max_connections = config.max_connections,
        "connected to database"
    );

    // Formatting the launch error marks it handled
    flight_booking::build_rocket(config, database.pool)
        .launch()
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
