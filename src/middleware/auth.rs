use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::AppError;
use crate::services::user_service::UserService;
use crate::utils::jwt;

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

/// Implémentation de FromRequest pour AuthUser
/// En plus de vérifier le token, recharge l'utilisateur (un compte supprimé
/// est refusé) et met à jour son last_seen
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let config = req
                .app_data::<web::Data<Config>>()
                .ok_or_else(|| AppError::internal("load config from app data"))?;
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| AppError::internal("load database from app data"))?;

            // 1. Extraire le token (format: "Bearer <token>")
            let token = bearer_token(&req)?;

            // 2. Vérifier le token JWT
            let claims = jwt::verify_token(&config.secret_key, token).map_err(|e| {
                tracing::debug!(error = %e, "rejected session token");
                AppError::Unauthorized("Invalid token".to_string())
            })?;

            // 3. Recharger l'utilisateur et mettre à jour last_seen
            let user = UserService::touch_last_seen(db.get_ref(), claims.sub)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

            Ok::<_, Error>(AuthUser {
                user_id: user.id,
                username: user.username,
            })
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized(
            "Invalid Authorization format (expected: Bearer <token>)".to_string(),
        )
    })
}
