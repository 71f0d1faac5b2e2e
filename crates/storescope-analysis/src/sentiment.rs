//! Sentiment analysis over the profile's combined text corpus.

use chrono::Utc;

use storescope_core::BrandProfile;

use crate::config::AnalysisConfig;
use crate::corpus::{self, MAX_CORPUS_CHARS};
use crate::error::AnalysisError;
use crate::lexicon::polarity_score;
use crate::types::SentimentReport;

/// Analyzes overall brand polarity from narrative, policies, product
/// descriptions, and FAQs.
///
/// Pure: the same profile and config always produce the same report (modulo
/// the generation timestamp).
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyCorpus`] when the profile carries no text
/// at all.
pub fn analyze_sentiment(
    profile: &BrandProfile,
    config: &AnalysisConfig,
) -> Result<SentimentReport, AnalysisError> {
    let corpus = corpus::sentiment_corpus(profile);
    if corpus.trim().is_empty() {
        return Err(AnalysisError::EmptyCorpus);
    }

    let polarity = polarity_score(&corpus);
    let (positive_pct, negative_pct) = polarity_split(polarity);
    let neutral_pct = 100.0 - positive_pct - negative_pct;

    let key_themes = corpus::top_terms([corpus.as_str()], config.key_theme_count);
    let source_fields = profile.present_source_fields();
    let confidence = confidence_for(&corpus, source_fields, config);

    tracing::debug!(
        polarity,
        confidence,
        corpus_chars = corpus.len(),
        "sentiment analysis complete"
    );

    Ok(SentimentReport {
        generated_at: Utc::now(),
        polarity,
        positive_pct,
        negative_pct,
        neutral_pct,
        key_themes,
        corpus_chars: corpus.len(),
        source_fields,
        confidence,
    })
}

/// Piecewise mapping from polarity to a positive/negative percentage split.
/// Near-neutral polarity lands on a 40/30/30 split.
fn polarity_split(polarity: f32) -> (f32, f32) {
    if polarity > 0.1 {
        (60.0 + polarity * 30.0, 20.0 - polarity * 15.0)
    } else if polarity < -0.1 {
        (20.0 + polarity * 15.0, 60.0 - polarity * 30.0)
    } else {
        (40.0, 30.0)
    }
}

/// Confidence grows with corpus length and with the number of populated
/// source fields; a corpus below the configured minimum halves it.
fn confidence_for(corpus: &str, source_fields: usize, config: &AnalysisConfig) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let length_factor = (corpus.len() as f32 / MAX_CORPUS_CHARS as f32).min(1.0);
    #[allow(clippy::cast_precision_loss)]
    let field_factor = if config.sentiment_min_fields == 0 {
        1.0
    } else {
        (source_fields as f32 / config.sentiment_min_fields as f32).min(1.0)
    };

    let mut confidence = 0.25 + 0.5 * length_factor + 0.25 * field_factor;
    if corpus.len() < config.sentiment_min_corpus_chars {
        confidence *= 0.5;
    }
    confidence.clamp(0.0, 1.0)
}
