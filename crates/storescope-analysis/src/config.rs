use storescope_core::AppConfig;

/// Thresholds and counts the analyzers read, loaded once at startup and
/// passed explicitly into every call. Analyzers hold no state of their own.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub sentiment_min_corpus_chars: usize,
    pub sentiment_min_fields: usize,
    pub key_theme_count: usize,
    pub seo_keyword_count: usize,
    pub pricing_premium_threshold: f64,
    pub pricing_value_threshold: f64,
    pub pricing_dispersion_ceiling: f64,
}

impl AnalysisConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            sentiment_min_corpus_chars: config.sentiment_min_corpus_chars,
            sentiment_min_fields: config.sentiment_min_fields,
            key_theme_count: config.key_theme_count,
            seo_keyword_count: config.seo_keyword_count,
            pricing_premium_threshold: config.pricing_premium_threshold,
            pricing_value_threshold: config.pricing_value_threshold,
            pricing_dispersion_ceiling: config.pricing_dispersion_ceiling,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sentiment_min_corpus_chars: 80,
            sentiment_min_fields: 2,
            key_theme_count: 5,
            seo_keyword_count: 15,
            pricing_premium_threshold: 150.0,
            pricing_value_threshold: 30.0,
            pricing_dispersion_ceiling: 0.75,
        }
    }
}
