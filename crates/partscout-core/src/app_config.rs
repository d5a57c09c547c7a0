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

/// Explicit session context shared by the search source and the auth client.
#[derive(Clone)]
pub struct AppConfig {
    /// Parts API base, without a trailing slash (e.g. `http://host:8015/api`).
    pub api_base_url: String,
    pub env: Environment,
    pub log_level: String,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    /// Currency snapshotted into cart lines when an offer does not carry one.
    pub default_currency: String,
    pub stream_max_retries: u32,
    pub stream_retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[redacted]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("default_currency", &self.default_currency)
            .field("stream_max_retries", &self.stream_max_retries)
            .field(
                "stream_retry_backoff_base_secs",
                &self.stream_retry_backoff_base_secs,
            )
            .finish()
    }
}
