// SQLite UserRepository Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;
use uneventful_core::domain::{User, UserId};
use uneventful_core::error::{AppError, Result};
use uneventful_core::port::UserRepository;

use crate::error_map::map_sqlx_error;

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, first_name, last_name, phone, email,
                is_active, is_admin, is_verified,
                created_at, updated_at, deleted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(user.is_admin)
        .bind(user.is_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users WHERE phone = ? AND deleted_at IS NULL",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(UserRow::into_user))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        first_name: &str,
        last_name: &str,
        now_millis: i64,
    ) -> Result<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(now_millis)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    first_name: String,
    last_name: String,
    phone: String,
    email: Option<String>,
    is_active: bool,
    is_admin: bool,
    is_verified: bool,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            is_active: self.is_active,
            is_admin: self.is_admin,
            is_verified: self.is_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn repo() -> SqliteUserRepository {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteUserRepository::new(pool)
    }

    #[tokio::test]
    async fn insert_and_find_round_trip() {
        let repo = repo().await;
        let user = User::new("u-1", 1000, "Ada", "Lovelace", "+15551234567", None);
        repo.insert(&user).await.unwrap();

        let by_id = repo.find_by_id(&"u-1".to_string()).await.unwrap().unwrap();
        assert_eq!(by_id.first_name, "Ada");

        let by_phone = repo.find_by_phone("+15551234567").await.unwrap().unwrap();
        assert_eq!(by_phone.id, "u-1");

        assert!(repo.find_by_phone("+15559999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_active_phone_is_conflict() {
        let repo = repo().await;
        let user = User::new("u-1", 1000, "Ada", "Lovelace", "+15551234567", None);
        repo.insert(&user).await.unwrap();

        let dup = User::new("u-2", 2000, "Grace", "Hopper", "+15551234567", None);
        let err = repo.insert(&dup).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn soft_deleted_users_are_invisible() {
        let repo = repo().await;
        let mut user = User::new("u-1", 1000, "Ada", "Lovelace", "+15551234567", None);
        user.deleted_at = Some(5000);
        repo.insert(&user).await.unwrap();

        assert!(repo.find_by_id(&"u-1".to_string()).await.unwrap().is_none());
        assert!(repo.find_by_phone("+15551234567").await.unwrap().is_none());

        // The phone is free again for a new signup
        let fresh = User::new("u-2", 6000, "Ada", "Lovelace", "+15551234567", None);
        repo.insert(&fresh).await.unwrap();
    }

    #[tokio::test]
    async fn update_profile_bumps_updated_at() {
        let repo = repo().await;
        let user = User::new("u-1", 1000, "Ada", "Lovelace", "+15551234567", None);
        repo.insert(&user).await.unwrap();

        let updated = repo
            .update_profile(&"u-1".to_string(), "Augusta", "King", 9000)
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Augusta");
        assert_eq!(updated.last_name, "King");
        assert_eq!(updated.updated_at, 9000);
        assert_eq!(updated.created_at, 1000);
    }

    #[tokio::test]
    async fn update_profile_of_missing_user_is_not_found() {
        let repo = repo().await;
        let err = repo
            .update_profile(&"ghost".to_string(), "A", "B", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
