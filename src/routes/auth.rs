use actix_web::{post, get, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::config::Config;
use crate::errors::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, ResetPasswordForm,
    ResetPasswordRequestForm, UserView,
};
use crate::services::mailer::{self, Mailer};
use crate::services::user_service::UserService;
use crate::utils::jwt;

const RESET_REQUESTED_MESSAGE: &str =
    "Check your email for the instructions to reset your password.";

/// POST /auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = UserService::register(db.get_ref(), &body).await?;
    let token = jwt::generate_token(&config.secret_key, user.id, &user.username)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}

/// POST /auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = UserService::authenticate(db.get_ref(), &body.username, &body.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    let token = jwt::generate_token(&config.secret_key, user.id, &user.username)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}

/// GET /auth/me - Utilisateur courant (PROTÉGÉE)
#[get("/me")]
pub async fn me(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::find_by_id(db.get_ref(), auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserView::from(user)))
}

/// POST /auth/reset-password-request - Demander un email de reset (PUBLIC)
/// La réponse est la même que l'email soit connu ou non
#[post("/reset-password-request")]
pub async fn reset_password_request(
    body: web::Json<ResetPasswordRequestForm>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<Config>,
    mailer: web::Data<dyn Mailer>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    if let Some(user) = UserService::find_by_email(db.get_ref(), &body.email).await? {
        let token = jwt::issue_reset_token(&config.secret_key, user.id, config.reset_token_ttl_secs)?;
        let message = mailer::password_reset_email(config.mail_sender(), &user, &token);

        // La réponse ne dépend pas du résultat de l'envoi
        match mailer.send(message).await {
            Ok(()) => tracing::info!(user_id = user.id, "password reset email sent"),
            Err(e) => tracing::error!(error = %e, user_id = user.id, "failed to send password reset email"),
        }
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new(RESET_REQUESTED_MESSAGE)))
}

/// POST /auth/reset-password/{token} - Choisir un nouveau mot de passe (PUBLIC)
#[post("/reset-password/{token}")]
pub async fn reset_password(
    token: web::Path<String>,
    body: web::Json<ResetPasswordForm>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let invalid = || AppError::BadRequest("Invalid or expired reset token".to_string());

    let user_id = jwt::verify_reset_token(&config.secret_key, &token).ok_or_else(invalid)?;
    let user = UserService::find_by_id(db.get_ref(), user_id)
        .await?
        .ok_or_else(invalid)?;

    body.validate()?;

    UserService::set_password(db.get_ref(), user, &body.password).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Your password has been reset.")))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(me)
            .service(reset_password_request)
            .service(reset_password)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::routes::configure_routes;
    use crate::services::mailer::testing::{FailingMailer, RecordingMailer};
    use crate::test_utils::{create_user, setup_db};

    #[actix_web::test]
    async fn test_register_login_me() {
        let db = setup_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(Config::default()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": "susan",
                "email": "susan@example.com",
                "password": "cat",
                "password2": "cat"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "susan", "password": "dog" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "susan", "password": "cat" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let token = body["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let me_body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me_body["username"], "susan");
        assert!(me_body["last_seen"].is_string());
        assert!(me_body.get("password_hash").is_none());
    }

    #[actix_web::test]
    async fn test_register_rejects_mismatched_passwords() {
        let db = setup_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(Config::default()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": "susan",
                "email": "not-an-email",
                "password": "cat",
                "password2": "dog"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["fields"].get("password2").is_some());
        assert!(body["fields"].get("email").is_some());
    }

    #[actix_web::test]
    async fn test_me_requires_token() {
        let db = setup_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(Config::default()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_password_reset_flow() {
        let db = setup_db().await;
        let config = Config::default();
        let recorder = Arc::new(RecordingMailer::default());
        let mailer: Arc<dyn Mailer> = recorder.clone();

        let user = UserService::register(
            &db,
            &RegisterRequest {
                username: "susan".into(),
                email: "susan@example.com".into(),
                password: "cat".into(),
                password2: "cat".into(),
            },
        )
        .await
        .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(config.clone()))
                .app_data(web::Data::from(mailer))
                .configure(configure_routes),
        )
        .await;

        // Email inconnu: même réponse, aucun email envoyé
        let req = test::TestRequest::post()
            .uri("/api/auth/reset-password-request")
            .set_json(json!({ "email": "nobody@example.com" }))
            .to_request();
        let unknown: Value = test::call_and_read_body_json(&app, req).await;
        assert!(recorder.sent().is_empty());

        let req = test::TestRequest::post()
            .uri("/api/auth/reset-password-request")
            .set_json(json!({ "email": "susan@example.com" }))
            .to_request();
        let known: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(unknown, known);

        let sent = recorder.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["susan@example.com"]);

        // Le token est la ligne du message qui se vérifie
        let token = sent[0]
            .text_body
            .lines()
            .find(|line| jwt::verify_reset_token(&config.secret_key, line) == Some(user.id))
            .unwrap()
            .to_string();

        let req = test::TestRequest::post()
            .uri("/api/auth/reset-password/garbage")
            .set_json(json!({ "password": "dog", "password2": "dog" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri(&format!("/api/auth/reset-password/{}", token))
            .set_json(json!({ "password": "dog", "password2": "dog" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "susan", "password": "dog" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_reset_request_same_response_when_mail_fails() {
        let db = setup_db().await;
        create_user(&db, "susan").await;
        let mailer: Arc<dyn Mailer> = Arc::new(FailingMailer);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(Config::default()))
                .app_data(web::Data::from(mailer))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/reset-password-request")
            .set_json(json!({ "email": "susan@example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let known: Value = test::read_body_json(resp).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/reset-password-request")
            .set_json(json!({ "email": "nobody@example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let unknown: Value = test::read_body_json(resp).await;

        assert_eq!(known, unknown);
        assert_eq!(known["message"], RESET_REQUESTED_MESSAGE);
    }

    #[actix_web::test]
    async fn test_reset_token_rejected_for_missing_user_or_expired() {
        let db = setup_db().await;
        let config = Config::default();
        let user = create_user(&db, "susan").await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(config.clone()))
                .configure(configure_routes),
        )
        .await;

        // Token bien signé mais pour un utilisateur qui n'existe pas
        let orphan = jwt::issue_reset_token(&config.secret_key, 9999, 600).unwrap();
        let req = test::TestRequest::post()
            .uri(&format!("/api/auth/reset-password/{}", orphan))
            .set_json(json!({ "password": "dog", "password2": "dog" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid or expired reset token");

        // Token expiré pour un utilisateur existant
        let expired = jwt::issue_reset_token(&config.secret_key, user.id, -1).unwrap();
        let req = test::TestRequest::post()
            .uri(&format!("/api/auth/reset-password/{}", expired))
            .set_json(json!({ "password": "dog", "password2": "dog" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid or expired reset token");
    }
}
