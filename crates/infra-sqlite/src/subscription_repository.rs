// SQLite SubscriptionRepository Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;
use uneventful_core::domain::{EventId, Subscription, UserId};
use uneventful_core::error::{AppError, Result};
use uneventful_core::port::SubscriptionRepository;

use crate::error_map::map_sqlx_error;

pub struct SqliteSubscriptionRepository {
    pool: SqlitePool,
}

impl SqliteSubscriptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn upsert(
        &self,
        id: &str,
        user_id: &UserId,
        event_id: &EventId,
        now_millis: i64,
    ) -> Result<Subscription> {
        sqlx::query(
            r#"
            INSERT INTO event_subscriptions (id, user_id, event_id, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, event_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(event_id)
        .bind(now_millis)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        // Re-read so a pre-existing row keeps its original id and timestamp.
        self.find(user_id, event_id).await?.ok_or_else(|| {
            AppError::Database("Subscription missing after upsert".to_string())
        })
    }

    async fn delete(&self, user_id: &UserId, event_id: &EventId) -> Result<()> {
        sqlx::query("DELETE FROM event_subscriptions WHERE user_id = ? AND event_id = ?")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn find(&self, user_id: &UserId, event_id: &EventId) -> Result<Option<Subscription>> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            "SELECT * FROM event_subscriptions WHERE user_id = ? AND event_id = ?",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SubscriptionRow::into_subscription))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: String,
    user_id: String,
    event_id: String,
    created_at: i64,
}

impl SubscriptionRow {
    fn into_subscription(self) -> Subscription {
        Subscription {
            id: self.id,
            user_id: self.user_id,
            event_id: self.event_id,
            created_at: self.created_at,
        }
    }
}
