//! Menu Item Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu item model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: Option<String>,
    pub prep_time_minutes: Option<i64>,
    pub rating: f64,
    pub popular: bool,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create menu item payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MenuItemCreate {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 60))]
    pub category: String,
    pub image: Option<String>,
    #[validate(range(min = 0))]
    pub prep_time_minutes: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[serde(default)]
    pub popular: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// Update menu item payload - absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MenuItemUpdate {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 60))]
    pub category: Option<String>,
    pub image: Option<String>,
    #[validate(range(min = 0))]
    pub prep_time_minutes: Option<i64>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub popular: Option<bool>,
    pub is_available: Option<bool>,
}

impl MenuItem {
    /// Build a new item from a create payload
    pub fn from_create(payload: MenuItemCreate) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: payload.name,
            description: payload.description,
            price: payload.price,
            category: payload.category,
            image: payload.image,
            prep_time_minutes: payload.prep_time_minutes,
            rating: payload.rating,
            popular: payload.popular,
            is_available: payload.is_available,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update payload, refreshing `updated_at`
    pub fn apply_update(&mut self, payload: MenuItemUpdate) {
        if let Some(name) = payload.name {
            self.name = name;
        }
        if let Some(description) = payload.description {
            self.description = description;
        }
        if let Some(price) = payload.price {
            self.price = price;
        }
        if let Some(category) = payload.category {
            self.category = category;
        }
        if payload.image.is_some() {
            self.image = payload.image;
        }
        if payload.prep_time_minutes.is_some() {
            self.prep_time_minutes = payload.prep_time_minutes;
        }
        if let Some(rating) = payload.rating {
            self.rating = rating;
        }
        if let Some(popular) = payload.popular {
            self.popular = popular;
        }
        if let Some(is_available) = payload.is_available {
            self.is_available = is_available;
        }
        self.updated_at = Utc::now();
    }
}
