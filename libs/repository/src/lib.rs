use activity::ActivityRepository;
use admin::AdminRepository;
use migration::Migrator;
use migration::MigratorTrait;
use post::PostRepository;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

mod active_models;
pub mod activity;
pub mod admin;
pub mod post;
mod store;

pub use store::{ActivitySink, AdminCheck, PostStore};

#[derive(Clone, Debug)]
pub struct Repository {
    pub post: PostRepository,
    pub admin: AdminRepository,
    pub activity: ActivityRepository,
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sea_orm::DbErr),

    #[error("failed to run migrations: {0}")]
    Migrate(#[source] sea_orm::DbErr),
}

impl Repository {
    pub async fn new(db_url: &str) -> Result<Self, RepositoryError> {
        let db = init_db(db_url).await?;

        Ok(Self::from_connection(db))
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            post: PostRepository::new(db.clone()),
            admin: AdminRepository::new(db.clone()),
            activity: ActivityRepository::new(db),
        }
    }
}

async fn init_db(db_url: &str) -> Result<DatabaseConnection, RepositoryError> {
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(5)
        .min_connections(1)
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt)
        .await
        .map_err(RepositoryError::Connect)?;

    Migrator::up(&db, None)
        .await
        .map_err(RepositoryError::Migrate)?;

    Ok(db)
}
