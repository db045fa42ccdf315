//! Layered settings: built-in defaults, an optional `todo-board.toml` in
//! the working directory, then `TODO_BOARD__*` environment variables.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://todoapitest.juansegaliz.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Service root; the `/Todos` resource is appended by the client.
    pub base_url: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .add_source(File::with_name("todo-board").required(false))
            .add_source(Environment::with_prefix("TODO_BOARD").separator("__")))
    }
}
