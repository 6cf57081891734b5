// src/lib.rs

//! Lotfront: dealership inventory queries and saved-unit lists

pub mod error;
pub mod format;
pub mod lists;
pub mod models;
pub mod query;
pub mod services;
pub mod storage;
