//! Pricing analysis: distribution statistics, tier classification, and
//! recommendations.

use chrono::Utc;

use storescope_core::BrandProfile;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::types::{PriceDistribution, PricingReport, PricingTier};

/// Analyzes the catalog's price distribution.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] when the catalog has no
/// priced products. Siblings and the unified report are unaffected.
pub fn analyze_pricing(
    profile: &BrandProfile,
    config: &AnalysisConfig,
) -> Result<PricingReport, AnalysisError> {
    let mut prices = profile.prices();
    if prices.is_empty() {
        return Err(AnalysisError::InsufficientData {
            reason: "catalog has no priced products".to_owned(),
        });
    }
    prices.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let distribution = distribution_of(&prices);
    let tier = classify_tier(&distribution, config);
    let recommendations = recommendations_for(tier, &distribution, config);
    let confidence = confidence_for(prices.len());

    tracing::debug!(
        products = prices.len(),
        mean = distribution.mean,
        tier = %tier,
        "pricing analysis complete"
    );

    Ok(PricingReport {
        generated_at: Utc::now(),
        priced_products: prices.len(),
        distribution,
        tier,
        recommendations,
        confidence,
    })
}

/// Distribution statistics over ascending-sorted prices.
fn distribution_of(sorted: &[f64]) -> PriceDistribution {
    #[allow(clippy::cast_precision_loss)]
    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    let dispersion = if mean > 0.0 {
        variance.sqrt() / mean
    } else {
        0.0
    };

    PriceDistribution {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean,
        median: percentile(sorted, 0.5),
        q1: percentile(sorted, 0.25),
        q3: percentile(sorted, 0.75),
        dispersion,
    }
}

/// Linear-interpolation percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    #[allow(clippy::cast_precision_loss)]
    let rank = p * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = rank.floor() as usize;
    let upper = lower + 1;
    let fraction = rank - rank.floor();
    if upper >= sorted.len() {
        return sorted[lower];
    }
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Tier rules: `premium` needs a high mean *and* low dispersion — a store
/// with a few expensive outliers is still `competitive`. `value` is purely
/// mean-driven.
fn classify_tier(distribution: &PriceDistribution, config: &AnalysisConfig) -> PricingTier {
    if distribution.mean >= config.pricing_premium_threshold
        && distribution.dispersion <= config.pricing_dispersion_ceiling
    {
        PricingTier::Premium
    } else if distribution.mean <= config.pricing_value_threshold {
        PricingTier::Value
    } else {
        PricingTier::Competitive
    }
}

/// 1–3 recommendations, highest impact first, derived from tier + dispersion.
fn recommendations_for(
    tier: PricingTier,
    distribution: &PriceDistribution,
    config: &AnalysisConfig,
) -> Vec<String> {
    let mut recommendations: Vec<String> = match tier {
        PricingTier::Premium => vec![
            "Keep service and presentation aligned with the premium price point".to_owned(),
            "Introduce an entry-level product to widen the top of the funnel".to_owned(),
        ],
        PricingTier::Value => vec![
            "Bundle complementary products to lift average order value".to_owned(),
            "Test modest price increases on best sellers".to_owned(),
        ],
        PricingTier::Competitive => vec![
            "Differentiate on brand story and product detail rather than price".to_owned(),
        ],
    };

    if distribution.dispersion > config.pricing_dispersion_ceiling {
        recommendations.push(
            "Clarify tier positioning: the catalog spans a wide price range".to_owned(),
        );
    }

    recommendations.truncate(3);
    recommendations
}

/// Confidence grows with the number of priced products, saturating at 20.
fn confidence_for(priced_products: usize) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let volume_factor = (priced_products as f32 / 20.0).min(1.0);
    (0.3 + 0.7 * volume_factor).clamp(0.0, 1.0)
}
