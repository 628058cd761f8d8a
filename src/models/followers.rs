// ============================================================================
// MODÈLE : FOLLOWERS
// ============================================================================
//
// Description:
//   Arête dirigée "follower_id suit followed_id". Pas de payload.
//
// Points d'attention:
//   - Clé primaire composite (follower_id, followed_id): une paire est unique
//   - Un utilisateur ne peut pas se suivre lui-même, mais c'est vérifié
//     dans services::follow_service, pas ici
//   - Pas de transitivité: A suit B qui suit C ne donne pas C dans le feed de A
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "followers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub follower_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub followed_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FollowerId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Follower,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FollowedId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Followed,
}

impl ActiveModelBehavior for ActiveModel {}
