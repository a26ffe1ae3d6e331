//! Database Models

pub mod account;
pub mod menu_item;
pub mod order;

pub use account::{Account, AccountCreate, Role};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{Order, OrderDraft, OrderLineItem, OrderRow, OrderStatus, OrderType};
