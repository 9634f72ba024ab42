use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{sea_query, ActiveValue, DatabaseConnection, EntityTrait};

use crate::active_models::{prelude::*, *};
use crate::store::AdminCheck;

#[derive(Clone, Debug)]
pub struct AdminRepository {
    db: DatabaseConnection,
}

impl AdminRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn grant(&self, uid: &str) -> anyhow::Result<()> {
        let model = admin::ActiveModel {
            uid: ActiveValue::set(uid.to_string()),
            created_at: ActiveValue::set(Utc::now()),
        };

        let _ = Admin::insert(model)
            .on_conflict(
                sea_query::OnConflict::column(admin::Column::Uid)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl AdminCheck for AdminRepository {
    async fn is_admin(&self, uid: &str) -> anyhow::Result<bool> {
        let admin = Admin::find_by_id(uid.to_string()).one(&self.db).await?;

        Ok(admin.is_some())
    }
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    #[tokio::test]
    async fn test_is_admin_checks_membership() {
        // Arrange
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![admin::Model {
                    uid: "uid-admin".to_string(),
                    created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
                }],
                vec![],
            ])
            .into_connection();
        let repository = AdminRepository::new(db);

        // Act
        let admin = repository.is_admin("uid-admin").await.unwrap();
        let reader = repository.is_admin("uid-1").await.unwrap();

        // Assert
        assert!(admin);
        assert!(!reader);
    }

    #[tokio::test]
    async fn test_grant_ignores_existing_admin() {
        // Arrange
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repository = AdminRepository::new(db.clone());

        // Act
        let first = repository.grant("uid-admin").await;
        let second = repository.grant("uid-admin").await;

        // Assert
        assert!(first.is_ok());
        assert!(second.is_ok());
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        let sql = format!("{:?}", log[1]);
        assert!(sql.contains("ON CONFLICT"), "{sql}");
        assert!(sql.contains("DO NOTHING"), "{sql}");
    }
}
