use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::config::Config;
use crate::errors::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{CreatePostRequest, PageQuery, PostView};
use crate::services::feed_service::FeedService;
use crate::services::user_service::UserService;

/// GET /posts?page=N - Feed de l'utilisateur courant (PROTÉGÉE)
#[get("/posts")]
pub async fn feed(
    auth_user: AuthUser,
    query: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let page = FeedService::followed_posts(
        db.get_ref(),
        auth_user.user_id,
        query.page(),
        config.posts_per_page,
    )
    .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// POST /posts - Publier un post (PROTÉGÉE)
#[post("/posts")]
pub async fn create_post(
    auth_user: AuthUser,
    body: web::Json<CreatePostRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let post = UserService::create_post(db.get_ref(), auth_user.user_id, &body.body).await?;
    tracing::info!(post_id = post.id, user_id = auth_user.user_id, "post created");

    let mut view = PostView::new(post, None);
    view.author = Some(auth_user.username);
    Ok(HttpResponse::Created().json(view))
}

/// GET /explore?page=N - Tous les posts (PROTÉGÉE)
#[get("/explore")]
pub async fn explore(
    _auth_user: AuthUser,
    query: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let page = FeedService::explore(db.get_ref(), query.page(), config.posts_per_page).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub fn posts_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(feed)
        .service(create_post)
        .service(explore);
}
