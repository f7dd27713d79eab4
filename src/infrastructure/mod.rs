#[path = "config/mod.rs"]
pub mod config_mod;
pub use config_mod as config;
pub mod csv;
pub mod notifier;
pub mod store;
