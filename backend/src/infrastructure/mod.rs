pub mod config;
pub mod host;
pub mod logging;
pub mod reports;
pub mod runtime_assets;
