mod app_config;
mod catalog;
mod config;

pub use app_config::{AppConfig, Environment};
pub use catalog::{slugify, CategoryRecord, HomePickRecord, ProductRecord};
pub use config::{
    load_app_config, load_app_config_from_env, ConfigError, DEFAULT_DESKTOP_USER_AGENT,
    DEFAULT_MOBILE_USER_AGENT,
};
