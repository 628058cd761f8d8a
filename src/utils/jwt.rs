use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

use crate::errors::AppError;

/// Claims du token de session (header Authorization: Bearer)
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub username: String,
    pub exp: i64,        // expiration timestamp
}

/// Claims du token de reset password
/// Jamais stocké en base: la signature et `exp` suffisent
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetClaims {
    pub reset_password: i32, // user_id
    pub exp: i64,
}

/// Génère un JWT token de session (24h) pour un utilisateur
pub fn generate_token(secret: &str, user_id: i32, username: &str) -> Result<String, AppError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::internal("calculate token expiration"))?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| AppError::internal(format!("generate token: {}", e)))
}

/// Vérifie et décode un JWT token de session
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
}

/// Émet un token de reset password valable `ttl_secs` secondes
pub fn issue_reset_token(secret: &str, user_id: i32, ttl_secs: i64) -> Result<String, AppError> {
    issue_reset_token_at(secret, user_id, ttl_secs, Utc::now().timestamp())
}

/// Même chose avec une horloge explicite (timestamp unix en secondes)
pub fn issue_reset_token_at(
    secret: &str,
    user_id: i32,
    ttl_secs: i64,
    now: i64,
) -> Result<String, AppError> {
    let claims = ResetClaims {
        reset_password: user_id,
        exp: now + ttl_secs,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| AppError::internal(format!("generate reset token: {}", e)))
}

/// Retourne l'id utilisateur si le token est valide, None sinon
/// Signature, format et expiration donnent tous le même None
pub fn verify_reset_token(secret: &str, token: &str) -> Option<i32> {
    verify_reset_token_at(secret, token, Utc::now().timestamp())
}

pub fn verify_reset_token_at(secret: &str, token: &str, now: i64) -> Option<i32> {
    // L'expiration est vérifiée ici contre `now`, pas contre l'horloge système
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
        .ok()?
        .claims;

    (now < claims.exp).then_some(claims.reset_password)
}
