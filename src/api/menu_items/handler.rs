//! Menu Item Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::{MenuItemFilter, MenuItemRepository};
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};

/// 菜单列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct MenuItemListQuery {
    pub category: Option<String>,
    pub available: Option<bool>,
    pub popular: Option<bool>,
}

/// GET /api/menu-items - 菜单列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuItemListQuery>,
) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let repo = MenuItemRepository::new(state.pool.clone());
    let items = repo
        .list(&MenuItemFilter {
            category: query.category,
            available: query.available,
            popular: query.popular,
        })
        .await?;

    Ok(ok(items))
}

/// GET /api/menu-items/{id} - 单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let repo = MenuItemRepository::new(state.pool.clone());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {}", id)))?;

    Ok(ok(item))
}

/// POST /api/admin/menu-items - 新建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    payload.validate()?;

    let item = MenuItem::from_create(payload);
    let repo = MenuItemRepository::new(state.pool.clone());
    repo.create(&item).await?;

    tracing::info!(item_id = %item.id, name = %item.name, "Menu item created");
    Ok(ok_with_message(item, "Menu item created"))
}

/// PUT /api/admin/menu-items/{id} - 更新菜品 (缺省字段保持不变)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    payload.validate()?;

    let repo = MenuItemRepository::new(state.pool.clone());
    let mut item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {}", id)))?;

    item.apply_update(payload);
    repo.update(&item).await?;

    Ok(ok(item))
}

/// DELETE /api/admin/menu-items/{id} - 删除菜品 (super_admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repo = MenuItemRepository::new(state.pool.clone());
    if !repo.delete(&id).await? {
        return Err(AppError::not_found(format!("Menu item {}", id)));
    }

    tracing::info!(item_id = %id, "Menu item deleted");
    Ok(ok_with_message((), "Menu item deleted"))
}
