use sea_orm::*;
use sea_orm::sea_query::OnConflict;

use crate::errors::AppError;
use crate::models::followers;

pub struct FollowService;

impl FollowService {
    /// `follower_id` suit `followed_id`
    /// Idempotent: suivre deux fois la même personne ne crée qu'une arête
    pub async fn follow(
        db: &DatabaseConnection,
        follower_id: i32,
        followed_id: i32,
    ) -> Result<(), AppError> {
        if follower_id == followed_id {
            return Err(AppError::BadRequest("You cannot follow yourself.".to_string()));
        }

        // Arête déjà présente: aucune ligne insérée
        let inserted = followers::Entity::insert(followers::ActiveModel {
            follower_id: Set(follower_id),
            followed_id: Set(followed_id),
        })
        .on_conflict(
            OnConflict::columns([followers::Column::FollowerId, followers::Column::FollowedId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

        if inserted > 0 {
            tracing::info!(follower_id, followed_id, "follow edge created");
        }
        Ok(())
    }

    /// Supprime l'arête si elle existe (no-op sinon)
    pub async fn unfollow(
        db: &DatabaseConnection,
        follower_id: i32,
        followed_id: i32,
    ) -> Result<(), AppError> {
        if follower_id == followed_id {
            return Err(AppError::BadRequest("You cannot unfollow yourself.".to_string()));
        }

        let result = followers::Entity::delete_by_id((follower_id, followed_id))
            .exec(db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(follower_id, followed_id, "follow edge removed");
        }
        Ok(())
    }

    pub async fn is_following(
        db: &DatabaseConnection,
        follower_id: i32,
        followed_id: i32,
    ) -> Result<bool, DbErr> {
        Ok(followers::Entity::find_by_id((follower_id, followed_id))
            .one(db)
            .await?
            .is_some())
    }

    /// Nombre d'utilisateurs qui suivent `user_id`
    pub async fn count_followers(db: &DatabaseConnection, user_id: i32) -> Result<u64, DbErr> {
        followers::Entity::find()
            .filter(followers::Column::FollowedId.eq(user_id))
            .count(db)
            .await
    }

    /// Nombre d'utilisateurs suivis par `user_id`
    pub async fn count_following(db: &DatabaseConnection, user_id: i32) -> Result<u64, DbErr> {
        followers::Entity::find()
            .filter(followers::Column::FollowerId.eq(user_id))
            .count(db)
            .await
    }
}
