use std::sync::Arc;
use chrono::{DateTime, Utc};
use relay_shared::{now_utc, AppConfig, RelayError, UserDirectory, UserLocator};
use crate::upstream::HelpdeskClient;

pub type SharedLocator = UserLocator<Arc<dyn UserDirectory>>;

/// 应用程序状态
#[derive(Clone)]
pub struct AppState {
    /// 服务配置
    pub config: Arc<AppConfig>,
    /// Helpdesk API client used by the proxy routes
    pub helpdesk: Arc<HelpdeskClient>,
    /// Fuzzy user search over the helpdesk directory
    pub locator: Arc<SharedLocator>,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, RelayError> {
        let helpdesk = Arc::new(HelpdeskClient::new(&config.upstream)?);
        let directory: Arc<dyn UserDirectory> = helpdesk.clone();
        Ok(Self::with_directory(config, helpdesk, directory))
    }

    /// Build state with a custom user directory behind the locator.
    pub fn with_directory(
        config: AppConfig,
        helpdesk: Arc<HelpdeskClient>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        let locator = UserLocator::with_settings(directory, config.search.locator_settings());

        Self {
            config: Arc::new(config),
            helpdesk,
            locator: Arc::new(locator),
            start_time: now_utc(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (now_utc() - self.start_time).num_seconds()
    }
}
