pub mod collectors;
pub mod config;
pub mod domain;
pub mod monitor;
pub mod ui;
