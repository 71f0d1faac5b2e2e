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

/// Runtime configuration for the service, loaded from environment variables.
///
/// Fetch settings feed the scraper's HTTP client and retry loop; the
/// sentiment/pricing knobs are folded into an `AnalysisConfig` by the
/// analysis crate at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Seconds a cached `BrandProfile` stays servable before a fresh fetch.
    pub cache_ttl_secs: u64,
    pub fetch_timeout_secs: u64,
    /// Additional attempts after the first failure for transient errors.
    pub fetch_max_retries: u32,
    /// Base delay for exponential backoff: `base * 2^attempt` milliseconds.
    pub fetch_backoff_base_ms: u64,
    pub fetch_user_agent: String,
    /// Budget of extra page fetches (policies, FAQ) per profile collection.
    pub max_followup_fetches: usize,
    /// Below this many corpus characters the sentiment confidence floor kicks in.
    pub sentiment_min_corpus_chars: usize,
    /// Minimum populated profile fields before sentiment confidence is penalized.
    pub sentiment_min_fields: usize,
    pub key_theme_count: usize,
    pub seo_keyword_count: usize,
    /// Mean price at or above which a low-dispersion catalog is `premium`.
    pub pricing_premium_threshold: f64,
    /// Mean price at or below which a catalog is `value`.
    pub pricing_value_threshold: f64,
    /// Maximum coefficient of variation still counted as "low dispersion".
    pub pricing_dispersion_ceiling: f64,
}
