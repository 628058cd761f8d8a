use chrono::Utc;
use sea_orm::*;

use crate::errors::AppError;
use crate::models::dto::{EditProfileRequest, RegisterRequest};
use crate::models::{posts, users};
use crate::utils::password;

pub struct UserService;

impl UserService {
    /// Crée un compte. Username et email doivent être libres.
    pub async fn register(
        db: &DatabaseConnection,
        request: &RegisterRequest,
    ) -> Result<users::Model, AppError> {
        if Self::find_by_username(db, &request.username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken.".to_string()));
        }
        if Self::find_by_email(db, &request.email).await?.is_some() {
            return Err(AppError::Conflict("Email already taken.".to_string()));
        }

        let password_hash = password::hash_password(&request.password)?;

        let user = Self::insert_user(
            db,
            users::ActiveModel {
                username: Set(request.username.clone()),
                email: Set(request.email.clone()),
                password_hash: Set(Some(password_hash)),
                about_me: Set(None),
                last_seen: Set(None),
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    // Deux inscriptions concurrentes peuvent passer la vérification: la
    // contrainte UNIQUE tranche et on répond 409
    async fn insert_user(
        db: &DatabaseConnection,
        user: users::ActiveModel,
    ) -> Result<users::Model, AppError> {
        user.insert(db)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "Username or email already taken."))
    }

    /// Retourne l'utilisateur si le couple username/password est correct
    /// Utilisateur inconnu et mauvais mot de passe donnent le même None
    pub async fn authenticate(
        db: &DatabaseConnection,
        username: &str,
        password_input: &str,
    ) -> Result<Option<users::Model>, AppError> {
        let Some(user) = Self::find_by_username(db, username).await? else {
            return Ok(None);
        };

        let Some(hash) = user.password_hash.as_deref() else {
            return Ok(None);
        };

        if password::verify_password(password_input, hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(db)
            .await
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await
    }

    /// Met à jour username et about_me. Le nouveau username doit être libre
    /// (sauf s'il est inchangé).
    pub async fn update_profile(
        db: &DatabaseConnection,
        user: users::Model,
        request: &EditProfileRequest,
    ) -> Result<users::Model, AppError> {
        if request.username != user.username
            && Self::find_by_username(db, &request.username).await?.is_some()
        {
            return Err(AppError::Conflict("Please use a different username.".to_string()));
        }

        let mut active_model: users::ActiveModel = user.into();
        active_model.username = Set(request.username.clone());
        active_model.about_me = Set(request.about_me.clone());

        active_model
            .update(db)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "Please use a different username."))
    }

    pub async fn set_password(
        db: &DatabaseConnection,
        user: users::Model,
        new_password: &str,
    ) -> Result<users::Model, AppError> {
        let new_hash = password::hash_password(new_password)?;

        let mut active_model: users::ActiveModel = user.into();
        active_model.password_hash = Set(Some(new_hash));

        let user = active_model.update(db).await?;
        tracing::info!(user_id = user.id, "password changed");
        Ok(user)
    }

    /// Met last_seen à maintenant. None si l'utilisateur n'existe plus.
    pub async fn touch_last_seen(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = Self::find_by_id(db, user_id).await? else {
            return Ok(None);
        };

        let mut active_model: users::ActiveModel = user.into();
        active_model.last_seen = Set(Some(Utc::now().naive_utc()));

        active_model.update(db).await.map(Some)
    }

    pub async fn create_post(
        db: &DatabaseConnection,
        user_id: i32,
        body: &str,
    ) -> Result<posts::Model, DbErr> {
        posts::ActiveModel {
            body: Set(body.to_string()),
            timestamp: Set(Utc::now().naive_utc()),
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}
