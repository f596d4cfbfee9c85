pub mod common;
pub mod item;
pub mod list;
pub mod product;

pub use common::*;
pub use item::*;
pub use list::*;
pub use product::*;
