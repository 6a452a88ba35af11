use database::{DatabaseConnectionInfo, PgDatabase};
use milsym::database::Database;
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected DB_URL and DB_NAME in env.");
    let database = PgDatabase::connect(database_connection_info)
        .await
        .expect("could not create database pool.");

    match database.ping().await {
        Ok(()) => log::info!("connected to database"),
        Err(why) => log::error!("could not reach database: {}", why),
    }

    // web server
    let config = WebConfig::from_env();
    if let Err(why) = start_web_server(WebState::new(database.clone()), &config).await {
        log::error!("web server failed: {}", why);
    }

    database.close().await;
}
