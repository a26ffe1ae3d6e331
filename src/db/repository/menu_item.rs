//! Menu Item Repository

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::MenuItem;
use crate::utils::AppResult;

/// Catalog listing criteria
#[derive(Debug, Clone, Default)]
pub struct MenuItemFilter {
    pub category: Option<String>,
    pub available: Option<bool>,
    pub popular: Option<bool>,
}

#[derive(Clone)]
pub struct MenuItemRepository {
    pool: SqlitePool,
}

impl MenuItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, item: &MenuItem) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO menu_items
                (id, name, description, price, category, image, prep_time_minutes,
                 rating, popular, is_available, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.category)
        .bind(&item.image)
        .bind(item.prep_time_minutes)
        .bind(item.rating)
        .bind(item.popular)
        .bind(item.is_available)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>("SELECT * FROM menu_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    pub async fn list(&self, filter: &MenuItemFilter) -> AppResult<Vec<MenuItem>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM menu_items WHERE 1=1");
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(available) = filter.available {
            qb.push(" AND is_available = ").push_bind(available);
        }
        if let Some(popular) = filter.popular {
            qb.push(" AND popular = ").push_bind(popular);
        }
        qb.push(" ORDER BY category, name");

        let items = qb
            .build_query_as::<MenuItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Full-row update; caller refreshes `updated_at` via `apply_update`
    pub async fn update(&self, item: &MenuItem) -> AppResult<()> {
        sqlx::query(
            "UPDATE menu_items SET
                name = ?, description = ?, price = ?, category = ?, image = ?,
                prep_time_minutes = ?, rating = ?, popular = ?, is_available = ?,
                updated_at = ?
             WHERE id = ?",
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.category)
        .bind(&item.image)
        .bind(item.prep_time_minutes)
        .bind(item.rating)
        .bind(item.popular)
        .bind(item.is_available)
        .bind(item.updated_at)
        .bind(&item.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Returns false when nothing was deleted
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
