//! Repositories
//!
//! Plain structs over the shared [`sqlx::SqlitePool`]; all date filtering is
//! done against `DateTime<Utc>` values bound by the handlers.

mod account;
mod menu_item;
mod order;

pub use account::AccountRepository;
pub use menu_item::{MenuItemFilter, MenuItemRepository};
pub use order::{OrderFilter, OrderRepository, OrderSortKey, SortDirection};
