//! File domain entities.

pub mod category;
pub mod model;
pub mod share;

pub use category::Category;
pub use model::{FileRecord, NewFileRecord};
pub use share::SharePermission;
