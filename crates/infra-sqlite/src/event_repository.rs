// SQLite EventRepository Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;
use uneventful_core::domain::{Event, EventData, EventId, UserId};
use uneventful_core::error::{AppError, Result};
use uneventful_core::port::EventRepository;

use crate::error_map::map_sqlx_error;

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn insert(&self, event: &Event) -> Result<()> {
        let data_json = serde_json::to_string(event.data.as_map())?;
        let completed_json = if event.completed_tasks.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&event.completed_tasks)?)
        };

        sqlx::query(
            r#"
            INSERT INTO events (id, user_id, data, completed_tasks, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(&event.user_id)
        .bind(&data_json)
        .bind(&completed_json)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(EventRow::into_event).transpose()
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            "SELECT * FROM events WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(EventRow::into_event).collect()
    }

    async fn update_data(&self, id: &EventId, data: &EventData, now_millis: i64) -> Result<()> {
        let data_json = serde_json::to_string(data.as_map())?;

        let result = sqlx::query("UPDATE events SET data = ?, updated_at = ? WHERE id = ?")
            .bind(&data_json)
            .bind(now_millis)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        Ok(())
    }

    async fn update_completed_tasks(
        &self,
        id: &EventId,
        completed_tasks: &[String],
        now_millis: i64,
    ) -> Result<()> {
        let completed_json = serde_json::to_string(completed_tasks)?;

        let result =
            sqlx::query("UPDATE events SET completed_tasks = ?, updated_at = ? WHERE id = ?")
                .bind(&completed_json)
                .bind(now_millis)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> =
            sqlx::query_as("SELECT * FROM events ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(EventRow::into_event).collect()
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: String,
    user_id: String,
    data: String,
    completed_tasks: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl EventRow {
    fn into_event(self) -> Result<Event> {
        let data = EventData::from_value(serde_json::from_str(&self.data)?);
        let completed_tasks = match self.completed_tasks {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        Ok(Event {
            id: self.id,
            user_id: self.user_id,
            data,
            completed_tasks,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
