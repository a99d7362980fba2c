use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub store_url: String,
    pub store_service_key: String,
    pub store_timeout_secs: u64,
    pub marketplace_base: String,
    pub mobile_base: String,
    pub scrape_timeout_secs: u64,
    pub scrape_desktop_user_agent: String,
    pub scrape_mobile_user_agent: String,
    pub home_pick_count: usize,
    pub home_pick_pool_limit: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("store_url", &self.store_url)
            .field("store_service_key", &"[redacted]")
            .field("store_timeout_secs", &self.store_timeout_secs)
            .field("marketplace_base", &self.marketplace_base)
            .field("mobile_base", &self.mobile_base)
            .field("scrape_timeout_secs", &self.scrape_timeout_secs)
            .field(
                "scrape_desktop_user_agent",
                &self.scrape_desktop_user_agent,
            )
            .field("scrape_mobile_user_agent", &self.scrape_mobile_user_agent)
            .field("home_pick_count", &self.home_pick_count)
            .field("home_pick_pool_limit", &self.home_pick_pool_limit)
            .finish()
    }
}
