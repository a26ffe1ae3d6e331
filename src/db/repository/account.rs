//! Account Repository

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::{Account, AccountCreate};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account; duplicate username/email maps to 409
    pub async fn create(&self, payload: AccountCreate) -> AppResult<Account> {
        let account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            username: payload.username,
            email: payload.email,
            password_hash: payload.password_hash,
            role: payload.role,
            is_active: true,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO accounts (id, username, email, password_hash, role, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&account.id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role)
        .bind(account.is_active)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::conflict("Username or email already registered"),
            other => other,
        })?;

        Ok(account)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }
}
