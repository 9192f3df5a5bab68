use tracing::level_filters::LevelFilter;
use web_sys::window;

/// localStorage key holding the bearer token.
pub const TOKEN_KEY: &str = "access_token";
pub const LOGIN_PATH: &str = "/login";
pub const FEED_PATH: &str = "/";

const DEFAULT_API_BASE: &str = "/api";

/// Client settings, read from `<meta>` tags on the host page.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub log_level: LevelFilter,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            log_level: LevelFilter::INFO,
        }
    }
}

thread_local! {
    static CURRENT: ClientConfig = ClientConfig::from_document();
}

impl ClientConfig {
    /// The page's configuration, read on first use.
    pub fn current() -> Self {
        CURRENT.with(Clone::clone)
    }

    pub fn from_document() -> Self {
        let defaults = Self::default();
        Self {
            api_base: meta_content("shutter-api")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            log_level: meta_content("shutter-log-level")
                .and_then(|level| parse_level(&level))
                .unwrap_or(defaults.log_level),
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base, endpoint)
    }
}

fn meta_content(name: &str) -> Option<String> {
    let document = window()?.document()?;
    let el = document
        .query_selector(&format!("meta[name='{}']", name))
        .ok()
        .flatten()?;
    el.get_attribute("content").filter(|c| !c.is_empty())
}

fn parse_level(raw: &str) -> Option<LevelFilter> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::OFF),
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}
