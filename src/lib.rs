//! REST backend for planets, scientists, and the missions that link them.
//!
//! Layers, leaf-first: [`models`] (records and field validation),
//! [`serialize`] (cycle-free JSON views), [`db`] (SQLite persistence), and
//! [`api`] (axum routes).

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod serialize;
