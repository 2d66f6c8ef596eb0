//! # drivebox-entity
//!
//! Domain entity models for DriveBox: file records, categories, share
//! permissions, and users. Pure data types with serde derives; no I/O.

pub mod file;
pub mod user;
