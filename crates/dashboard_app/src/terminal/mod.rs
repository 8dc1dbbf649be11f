mod app;
mod commands;
pub mod config;
mod effects;
mod history;
mod render;

pub use app::run_app;
