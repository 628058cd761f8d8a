use actix_web::{get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::config::Config;
use crate::errors::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{EditProfileRequest, MessageResponse, PageQuery, ProfileResponse, UserView};
use crate::models::users;
use crate::services::feed_service::FeedService;
use crate::services::follow_service::FollowService;
use crate::services::user_service::UserService;

async fn find_user_or_404(
    db: &DatabaseConnection,
    username: &str,
) -> Result<users::Model, AppError> {
    UserService::find_by_username(db, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))
}

/// GET /users/{username}?page=N - Profil et posts d'un utilisateur (PROTÉGÉE)
#[get("/users/{username}")]
pub async fn profile(
    auth_user: AuthUser,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let db = db.get_ref();
    let user = find_user_or_404(db, &username).await?;

    let posts = FeedService::user_posts(db, user.id, query.page(), config.posts_per_page).await?;
    let followers = FollowService::count_followers(db, user.id).await?;
    let following = FollowService::count_following(db, user.id).await?;
    let is_following = FollowService::is_following(db, auth_user.user_id, user.id).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        user: UserView::from(user),
        followers,
        following,
        is_following,
        posts,
    }))
}

/// PUT /profile - Modifier son username et son about_me (PROTÉGÉE)
#[put("/profile")]
pub async fn edit_profile(
    auth_user: AuthUser,
    body: web::Json<EditProfileRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = UserService::find_by_id(db.get_ref(), auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let user = UserService::update_profile(db.get_ref(), user, &body).await?;
    Ok(HttpResponse::Ok().json(UserView::from(user)))
}

/// POST /follow/{username} (PROTÉGÉE)
#[post("/follow/{username}")]
pub async fn follow(
    auth_user: AuthUser,
    username: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let target = find_user_or_404(db.get_ref(), &username).await?;
    FollowService::follow(db.get_ref(), auth_user.user_id, target.id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "You are now following {}.",
        target.username
    ))))
}

/// POST /unfollow/{username} (PROTÉGÉE)
#[post("/unfollow/{username}")]
pub async fn unfollow(
    auth_user: AuthUser,
    username: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let target = find_user_or_404(db.get_ref(), &username).await?;
    FollowService::unfollow(db.get_ref(), auth_user.user_id, target.id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "You are not following {}.",
        target.username
    ))))
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(profile)
        .service(edit_profile)
        .service(follow)
        .service(unfollow);
}
