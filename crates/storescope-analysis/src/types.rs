//! Report types produced by the analyzer suite.
//!
//! Reports are derived, immutable, and recomputed per request; every report
//! carries its generation timestamp and a confidence score in `[0, 1]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub generated_at: DateTime<Utc>,
    /// Aggregate lexical polarity in `[-1, 1]` (negative..positive).
    pub polarity: f32,
    pub positive_pct: f32,
    pub negative_pct: f32,
    pub neutral_pct: f32,
    /// Most frequent non-stopword corpus terms, most frequent first.
    pub key_themes: Vec<String>,
    pub corpus_chars: usize,
    /// Profile fields that contributed text to the corpus.
    pub source_fields: usize,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaScore {
    pub label: String,
    /// Normalized share in `[0, 1]`; all persona scores sum to 1.
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketingReport {
    pub generated_at: DateTime<Utc>,
    /// Ranked persona scores, dominant first, summing to 1.
    pub personas: Vec<PersonaScore>,
    pub dominant_persona: String,
    pub content_strategy: Vec<String>,
    pub seo_keywords: Vec<String>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    Premium,
    Competitive,
    Value,
}

impl std::fmt::Display for PricingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingTier::Premium => write!(f, "premium"),
            PricingTier::Competitive => write!(f, "competitive"),
            PricingTier::Value => write!(f, "value"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceDistribution {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    /// Coefficient of variation (population std dev / mean); 0 for a
    /// single-price catalog.
    pub dispersion: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingReport {
    pub generated_at: DateTime<Utc>,
    pub priced_products: usize,
    pub distribution: PriceDistribution,
    pub tier: PricingTier,
    /// 1–3 recommendations, highest impact first.
    pub recommendations: Vec<String>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedReport {
    pub generated_at: DateTime<Utc>,
    /// Composite business health in `[0, 10]`.
    pub business_health_score: f32,
    pub sentiment: SentimentReport,
    pub marketing: MarketingReport,
    /// Absent when the catalog had no priced products; the unified report
    /// still succeeds with pricing weight zeroed.
    pub pricing: Option<PricingReport>,
    pub pricing_available: bool,
    /// Module recommendations merged highest-weight first.
    pub strategic_recommendations: Vec<String>,
    pub confidence: f32,
}
