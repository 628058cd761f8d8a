use sea_orm::*;
use sea_orm::sea_query::Query;
use serde::Serialize;

use crate::models::dto::PostView;
use crate::models::{followers, posts, users};

pub struct FeedService;

/// Une page de résultats, numérotée à partir de 1
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_num: Option<u64>,
    pub prev_num: Option<u64>,
}

impl<T> Page<T> {
    /// `page` et `per_page` doivent déjà être >= 1
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let pages = total.div_ceil(per_page);
        let has_next = page < pages;
        let has_prev = page > 1;

        Self {
            items,
            page,
            per_page,
            total,
            has_next,
            has_prev,
            next_num: has_next.then(|| page + 1),
            prev_num: has_prev.then(|| page - 1),
        }
    }
}

impl FeedService {
    /// Feed d'un utilisateur: ses posts + ceux des utilisateurs qu'il suit,
    /// du plus récent au plus ancien
    ///
    /// Une seule requête filtrée sur posts, donc pas de doublon même en cas
    /// de follow mutuel. Un user_id inconnu donne une page vide.
    pub async fn followed_posts(
        db: &DatabaseConnection,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<Page<PostView>, DbErr> {
        let followed = Query::select()
            .column(followers::Column::FollowedId)
            .from(followers::Entity)
            .and_where(followers::Column::FollowerId.eq(user_id))
            .to_owned();

        let select = posts::Entity::find().filter(
            Condition::any()
                .add(posts::Column::UserId.eq(user_id))
                .add(posts::Column::UserId.in_subquery(followed)),
        );

        Self::fetch_page(db, select, page, per_page).await
    }

    /// Posts d'un seul auteur (page de profil)
    pub async fn user_posts(
        db: &DatabaseConnection,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<Page<PostView>, DbErr> {
        let select = posts::Entity::find().filter(posts::Column::UserId.eq(user_id));
        Self::fetch_page(db, select, page, per_page).await
    }

    /// Tous les posts (page explore)
    pub async fn explore(
        db: &DatabaseConnection,
        page: u64,
        per_page: u64,
    ) -> Result<Page<PostView>, DbErr> {
        Self::fetch_page(db, posts::Entity::find(), page, per_page).await
    }

    /// Trie par timestamp décroissant puis id décroissant (ordre déterministe
    /// pour les posts du même instant) et découpe la page demandée
    async fn fetch_page(
        db: &DatabaseConnection,
        select: Select<posts::Entity>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<PostView>, DbErr> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let paginator = select
            .order_by_desc(posts::Column::Timestamp)
            .order_by_desc(posts::Column::Id)
            .find_also_related(users::Entity)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;

        // Page au-delà de la fin (ou offset qui déborde): page vide, sans requête
        let offset = (page - 1).checked_mul(per_page);
        let items = match offset {
            Some(offset) if offset < total => paginator
                .fetch_page(page - 1)
                .await?
                .into_iter()
                .map(|(post, author)| PostView::new(post, author))
                .collect(),
            _ => Vec::new(),
        };

        Ok(Page::new(items, page, per_page, total))
    }
}
