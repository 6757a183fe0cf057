//! Property rental marketplace browser: fetch listings from the rental API,
//! filter and sort them, and render them as cards.

pub mod browse;
pub mod config;
pub mod models;
pub mod present;
pub mod sources;
