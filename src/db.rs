// connexion BD

use sea_orm::{
    ConnectionTrait, ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};

use crate::config::Config;
use crate::models::{followers, posts, users};

pub async fn establish_connection(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);

    Database::connect(options).await
}

/// Crée les tables manquantes à partir des entités (pas d'outil de migration)
/// L'ordre compte: posts et followers référencent users
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, posts::Entity).await?;
    create_table(db, followers::Entity).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let table = entity.table_name().to_owned();
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    tracing::debug!(%table, "table ready");
    Ok(())
}
