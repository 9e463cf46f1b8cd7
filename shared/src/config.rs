use crate::locator::{LocatorSettings, DEFAULT_MAX_DISTANCE, DEFAULT_PAGE_SIZE};
use anyhow::Result;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub search: SearchConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Helpdesk API the relay forwards to.
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub token: String,
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `base_url` without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// 模糊搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub max_distance: usize,
    pub page_size: u32,
}

impl SearchConfig {
    pub fn locator_settings(&self) -> LocatorSettings {
        LocatorSettings {
            max_distance: self.max_distance,
            page_size: self.page_size,
        }
    }
}

pub fn load_config() -> Result<AppConfig> {
    // 加载 .env 文件
    dotenv().ok();

    load_config_from(Path::new("config"))
}

/// Build the configuration from files under `config_dir` and the environment.
///
/// Precedence, lowest first: built-in defaults (including the legacy `API` and
/// `TOKEN` variables), `default.*`, `{ENV}.*`, then `APP_*` variables.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig> {
    let environment = env::var("ENV").unwrap_or_else(|_| "development".to_string());

    let settings = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        // 旧版环境变量 API / TOKEN
        .set_default("upstream.base_url", legacy_var(&["API"]).unwrap_or_default())?
        .set_default("upstream.token", legacy_var(&["TOKEN", "token"]).unwrap_or_default())?
        .set_default("upstream.timeout_secs", 30)?
        .set_default("search.max_distance", DEFAULT_MAX_DISTANCE as i64)?
        .set_default("search.page_size", DEFAULT_PAGE_SIZE as i64)?
        // 添加默认配置文件
        .add_source(File::with_name(&config_dir.join("default").to_string_lossy()).required(false))
        // 添加环境特定配置文件
        .add_source(File::with_name(&config_dir.join(&environment).to_string_lossy()).required(false))
        // 添加环境变量，APP_UPSTREAM__BASE_URL -> upstream.base_url
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    // 构建配置
    let config: AppConfig = settings.try_deserialize()?;

    // 验证必要配置
    validate_config(&config)?;

    Ok(config)
}

fn legacy_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| env::var(name).ok().filter(|value| !value.is_empty()))
}

fn validate_config(config: &AppConfig) -> Result<()> {
    if config.upstream.base_url.is_empty() {
        return Err(anyhow::anyhow!("Upstream API url cannot be empty (set API or APP_UPSTREAM__BASE_URL)"));
    }

    if !config.upstream.base_url.starts_with("http://") && !config.upstream.base_url.starts_with("https://") {
        return Err(anyhow::anyhow!("Upstream API url must start with http:// or https://"));
    }

    if config.upstream.token.is_empty() {
        return Err(anyhow::anyhow!("Upstream API token cannot be empty (set TOKEN or APP_UPSTREAM__TOKEN)"));
    }

    if config.search.page_size == 0 {
        return Err(anyhow::anyhow!("Search page size must be greater than zero"));
    }

    Ok(())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            upstream: UpstreamConfig {
                base_url: "http://localhost:3000/api/v1".to_string(),
                token: String::new(),
                timeout_secs: 30,
            },
            search: SearchConfig {
                max_distance: DEFAULT_MAX_DISTANCE,
                page_size: DEFAULT_PAGE_SIZE,
            },
        }
    }
}
