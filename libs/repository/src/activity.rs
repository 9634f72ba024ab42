use async_trait::async_trait;
use entity::prelude::*;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::active_models::{prelude::*, *};
use crate::store::ActivitySink;

#[derive(Clone, Debug)]
pub struct ActivityRepository {
    db: DatabaseConnection,
}

impl ActivityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<ActivityEntity> for activity::ActiveModel {
    fn from(value: ActivityEntity) -> Self {
        Self {
            action: ActiveValue::set(value.action.name().to_string()),
            user_id: ActiveValue::set(value.user_id),
            context: ActiveValue::set(value.action.context()),
            created_at: ActiveValue::set(value.created_at),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ActivitySink for ActivityRepository {
    async fn record(&self, activity: ActivityEntity) -> anyhow::Result<()> {
        let model = activity::ActiveModel::from(activity);

        let _ = Activity::insert(model).exec(&self.db).await?;

        Ok(())
    }
}
