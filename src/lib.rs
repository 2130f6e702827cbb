// src/lib.rs

//! Flight search client library

pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod utils;
