use std::env;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; BrandScanBot/1.0; +https://github.com/brandscan)";

/// Scanner configuration loaded from environment variables.
/// Every field has a sensible default; nothing is required.
#[derive(Debug, Clone)]
pub struct Config {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_redirects: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let timeout_secs: u64 = env::var("BRANDSCAN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .expect("BRANDSCAN_TIMEOUT_SECS must be a number");
        let max_redirects: usize = env::var("BRANDSCAN_MAX_REDIRECTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .expect("BRANDSCAN_MAX_REDIRECTS must be a number");

        Self {
            user_agent: env::var("BRANDSCAN_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            max_redirects,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            max_redirects: 5,
        }
    }
}
