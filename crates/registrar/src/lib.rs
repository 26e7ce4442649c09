pub mod config;
pub mod db;
pub mod pdf;
pub mod server;
pub mod types;
