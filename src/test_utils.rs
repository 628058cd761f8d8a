// Helpers partagés par les tests: base SQLite en mémoire et fixtures

use chrono::{DateTime, NaiveDateTime};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use crate::db;
use crate::models::{followers, posts, users};

/// Base SQLite en mémoire avec le schéma créé
/// Une seule connexion: chaque connexion SQLite `:memory:` a sa propre base
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("connect to sqlite");
    db::create_schema(&db).await.expect("create schema");
    db
}

/// Timestamp UTC fixe, en secondes depuis l'epoch
pub fn ts(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(1_700_000_000 + secs, 0)
        .expect("valid timestamp")
        .naive_utc()
}

pub async fn create_user(db: &DatabaseConnection, username: &str) -> users::Model {
    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set(None),
        about_me: Set(None),
        last_seen: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub async fn create_post_at(
    db: &DatabaseConnection,
    user_id: i32,
    body: &str,
    timestamp: NaiveDateTime,
) -> posts::Model {
    posts::ActiveModel {
        body: Set(body.to_string()),
        timestamp: Set(timestamp),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert post")
}

pub async fn follow(db: &DatabaseConnection, follower_id: i32, followed_id: i32) {
    followers::ActiveModel {
        follower_id: Set(follower_id),
        followed_id: Set(followed_id),
    }
    .insert(db)
    .await
    .expect("insert follow edge");
}
