use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::models::health::HealthResponse;

#[get("/health")]
pub async fn health_check(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let database = db.ping().await.is_ok();

    let response = HealthResponse {
        status: if database { "ok" } else { "degraded" }.to_string(),
        database,
        time: Utc::now(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::Value;

    use crate::test_utils::setup_db;

    #[actix_web::test]
    async fn test_health_check() {
        let db = setup_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], true);
    }
}
