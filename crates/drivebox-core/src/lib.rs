//! # drivebox-core
//!
//! Core crate for DriveBox. Contains the trait seams (blob storage, file
//! registry), configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DriveBox crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
