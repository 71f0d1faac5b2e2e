//! Unified report composition: all three analyzers plus a business health
//! score and blended confidence.

use chrono::Utc;

use storescope_core::BrandProfile;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::marketing::analyze_marketing;
use crate::pricing::analyze_pricing;
use crate::sentiment::analyze_sentiment;
use crate::types::{PricingReport, SentimentReport, UnifiedReport};

/// Module weights for the blended confidence.
const SENTIMENT_WEIGHT: f32 = 0.4;
const MARKETING_WEIGHT: f32 = 0.3;
const PRICING_WEIGHT: f32 = 0.3;

/// A failed module contributes zero confidence and keeps this fraction of
/// its weight in the denominator.
const FAILED_WEIGHT_FACTOR: f32 = 0.5;

/// Runs all analyzer modules and merges them into one report.
///
/// Pricing's `InsufficientData` is tolerated: the unified report succeeds
/// with the pricing contribution zeroed and confidence degraded.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyCorpus`] when the profile has no text for
/// the sentiment module — with nothing to analyze there is no report to
/// compose.
pub fn compose_unified(
    profile: &BrandProfile,
    config: &AnalysisConfig,
) -> Result<UnifiedReport, AnalysisError> {
    let sentiment = analyze_sentiment(profile, config)?;
    let marketing = analyze_marketing(profile, config);
    let pricing = match analyze_pricing(profile, config) {
        Ok(report) => Some(report),
        Err(AnalysisError::InsufficientData { reason }) => {
            tracing::debug!(reason = %reason, "pricing unavailable — composing degraded report");
            None
        }
        Err(other) => return Err(other),
    };

    let business_health_score = health_score(profile, &sentiment, pricing.as_ref());
    let confidence = blended_confidence(&sentiment, marketing.confidence, pricing.as_ref());
    let strategic_recommendations =
        merge_recommendations(&sentiment, pricing.as_ref(), &marketing.content_strategy);

    Ok(UnifiedReport {
        generated_at: Utc::now(),
        business_health_score,
        pricing_available: pricing.is_some(),
        sentiment,
        marketing,
        pricing,
        strategic_recommendations,
        confidence,
    })
}

/// Health in `[0, 10]`: sentiment rescaled (×4), catalog completeness
/// (policies/FAQ/social/contact ×1 each), pricing coherence (×2).
fn health_score(
    profile: &BrandProfile,
    sentiment: &SentimentReport,
    pricing: Option<&PricingReport>,
) -> f32 {
    let sentiment_component = (sentiment.polarity + 1.0) / 2.0 * 4.0;

    let completeness = f32::from(u8::from(profile.has_policies()))
        + f32::from(u8::from(profile.has_faqs()))
        + f32::from(u8::from(profile.has_social_presence()))
        + f32::from(u8::from(profile.has_contact_channels()));

    let pricing_component = if pricing.is_some() { 2.0 } else { 0.0 };

    (sentiment_component + completeness + pricing_component).clamp(0.0, 10.0)
}

/// Weighted average of module confidences. A failed module contributes zero
/// confidence while keeping half its weight, so its absence always costs.
fn blended_confidence(
    sentiment: &SentimentReport,
    marketing_confidence: f32,
    pricing: Option<&PricingReport>,
) -> f32 {
    let mut numerator =
        SENTIMENT_WEIGHT * sentiment.confidence + MARKETING_WEIGHT * marketing_confidence;
    let mut denominator = SENTIMENT_WEIGHT + MARKETING_WEIGHT;

    match pricing {
        Some(report) => {
            numerator += PRICING_WEIGHT * report.confidence;
            denominator += PRICING_WEIGHT;
        }
        None => denominator += PRICING_WEIGHT * FAILED_WEIGHT_FACTOR,
    }

    (numerator / denominator).clamp(0.0, 1.0)
}

/// Strategic recommendations merged highest-weight first: sentiment-driven,
/// then pricing, then marketing, deduplicated and capped.
fn merge_recommendations(
    sentiment: &SentimentReport,
    pricing: Option<&PricingReport>,
    content_strategy: &[String],
) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();

    if sentiment.polarity < 0.0 {
        recommendations
            .push("Address negative brand sentiment before scaling acquisition".to_owned());
    } else if sentiment.polarity > 0.5 {
        recommendations
            .push("Amplify positive sentiment with testimonials and reviews".to_owned());
    }

    match pricing {
        Some(report) => recommendations.extend(report.recommendations.iter().take(2).cloned()),
        None => recommendations
            .push("Add product pricing data to unlock pricing intelligence".to_owned()),
    }

    recommendations.extend(content_strategy.iter().take(2).cloned());

    let mut seen = std::collections::HashSet::new();
    recommendations.retain(|r| seen.insert(r.clone()));
    recommendations.truncate(6);
    recommendations
}
