pub mod app_state;
pub mod config;
pub mod csv;
pub mod db;
pub mod error;
pub mod genai;
pub mod handlers;
pub mod models;
pub mod push;
pub mod routes;
pub mod triggers;
