pub mod health;
pub mod auth;
pub mod posts;
pub mod users;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(posts::posts_routes)
            .configure(users::users_routes)
    );
}
