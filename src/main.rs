mod config;
mod models;
mod routes;
mod db;
mod errors;
mod services;
mod utils;
mod middleware;
mod telemetry;
#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};

use crate::config::Config;
use crate::services::mailer::{LogMailer, Mailer};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    // Garder le guard: il vide le fichier de log à l'arrêt
    let _log_guard = telemetry::init(&Config::log_dir());

    let config = Config::from_env();

    tracing::info!("Connecting to database...");
    let db = db::establish_connection(&config)
        .await
        .map_err(std::io::Error::other)?;
    db::create_schema(&db)
        .await
        .map_err(std::io::Error::other)?;
    tracing::info!("Database connected");

    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
    let db = web::Data::new(db);
    let mailer = web::Data::from(mailer);
    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);

    tracing::info!("Starting server on http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(config.clone())
            .app_data(mailer.clone())
            .configure(routes::configure_routes)
    })
        .bind(bind_addr)?
        .run()
        .await
}
