//! different utility modules used throughout the project
/// calculator settings, defaults and TOML loading
pub mod config;
/// simplelog setup driven by the settings
pub mod logger;
