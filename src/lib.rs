pub mod app;
pub mod cli;
pub mod config;
pub mod dashboards;
pub mod events;
pub mod format;
pub mod listing;
pub mod loader;
pub mod probe;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::AppConfig;
