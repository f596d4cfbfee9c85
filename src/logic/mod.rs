pub mod catalog;
pub mod error;
pub mod lists;

pub use catalog::*;
pub use error::*;
pub use lists::*;
