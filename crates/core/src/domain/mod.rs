pub mod menu_item;
pub mod money;
pub mod order;
