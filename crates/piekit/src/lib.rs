pub mod catalog;
pub mod control;
pub mod icon;
pub mod item;
pub mod macros;

pub use catalog::{BuiltinCatalog, ItemCatalog, ItemClass, ItemKind};
pub use item::{ItemConfig, ItemName, ItemTypeId};
