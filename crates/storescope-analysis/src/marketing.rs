//! Marketing analysis: persona scoring, content strategy, SEO keywords.

use chrono::Utc;

use storescope_core::BrandProfile;

use crate::config::AnalysisConfig;
use crate::corpus::{top_terms, word_counts};
use crate::lexicon::PERSONA_LEXICONS;
use crate::types::{MarketingReport, PersonaScore};

/// Derives persona ranking, content strategy, and SEO keywords from the
/// profile. Infallible: with no signal the persona distribution is uniform
/// and confidence bottoms out.
#[must_use]
pub fn analyze_marketing(profile: &BrandProfile, config: &AnalysisConfig) -> MarketingReport {
    let corpus = marketing_corpus(profile);
    let counts = word_counts(&corpus);

    let mut raw: Vec<(String, f32)> = PERSONA_LEXICONS
        .iter()
        .map(|(label, keywords)| {
            let score: f32 = keywords
                .iter()
                .map(|(word, weight)| {
                    #[allow(clippy::cast_precision_loss)]
                    let count = counts.get(*word).copied().unwrap_or(0) as f32;
                    weight * count
                })
                .sum();
            ((*label).to_owned(), score)
        })
        .collect();

    let total: f32 = raw.iter().map(|(_, s)| s).sum();
    #[allow(clippy::cast_precision_loss)]
    let personas: Vec<PersonaScore> = if total > 0.0 {
        raw.iter()
            .map(|(label, score)| PersonaScore {
                label: label.clone(),
                score: score / total,
            })
            .collect()
    } else {
        let uniform = 1.0 / raw.len() as f32;
        raw.drain(..)
            .map(|(label, _)| PersonaScore {
                label,
                score: uniform,
            })
            .collect()
    };

    let mut personas = personas;
    personas.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
    let dominant_persona = personas[0].label.clone();

    let content_strategy = content_strategy_for(profile, &dominant_persona, total > 0.0);

    let title_and_nav_text: Vec<&str> = profile
        .product_catalog
        .iter()
        .map(|p| p.title.as_str())
        .chain(profile.navigation.iter().map(String::as_str))
        .collect();
    let seo_keywords = top_terms(title_and_nav_text, config.seo_keyword_count);

    let confidence = confidence_for(profile, total > 0.0);

    tracing::debug!(
        dominant = %dominant_persona,
        keywords = seo_keywords.len(),
        confidence,
        "marketing analysis complete"
    );

    MarketingReport {
        generated_at: Utc::now(),
        personas,
        dominant_persona,
        content_strategy,
        seo_keywords,
        confidence,
    }
}

/// Text the persona lexicons are matched against: narrative plus product
/// titles, descriptions, and tags.
fn marketing_corpus(profile: &BrandProfile) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(narrative) = &profile.brand_text_context {
        parts.push(narrative);
    }
    for product in &profile.product_catalog {
        parts.push(&product.title);
        if let Some(description) = &product.description {
            parts.push(description);
        }
        for tag in &product.tags {
            parts.push(tag);
        }
    }
    parts.join(" ")
}

/// Persona-led suggestions first, then rules driven by profile shape.
fn content_strategy_for(
    profile: &BrandProfile,
    dominant_persona: &str,
    has_signal: bool,
) -> Vec<String> {
    let mut strategies: Vec<String> = Vec::new();

    if has_signal {
        let persona_leads: &[&str] = match dominant_persona {
            "young-casual" => &[
                "Lean into short-form video and user-generated content",
                "Keep product copy conversational and visual-first",
            ],
            "premium-luxury" => &[
                "Tell the making-of story behind each product line",
                "Invest in editorial photography over volume posting",
            ],
            "professional-b2b" => &[
                "Publish use-case pages targeting specific job functions",
                "Add case studies and outcome-oriented copy",
            ],
            "eco-conscious" => &[
                "Document sourcing and material provenance openly",
                "Report sustainability outcomes, not just intentions",
            ],
            _ => &[],
        };
        strategies.extend(persona_leads.iter().map(|s| (*s).to_owned()));
    }

    if profile.social_handles.len() > 2 {
        strategies.push("Run a coordinated cross-platform social calendar".to_owned());
    }
    if profile.faqs.len() > 5 {
        strategies.push("Turn frequent customer questions into educational content".to_owned());
    }
    if profile.product_catalog.len() > 20 {
        strategies.push("Create category-specific campaign collections".to_owned());
    }
    if strategies.is_empty() {
        strategies.push("Build out brand story and product descriptions first".to_owned());
    }

    strategies.truncate(6);
    strategies
}

/// Confidence from how many marketing inputs exist, discounted when the
/// persona lexicons found no signal at all.
fn confidence_for(profile: &BrandProfile, has_signal: bool) -> f32 {
    let inputs = usize::from(profile.brand_text_context.is_some())
        + usize::from(!profile.product_catalog.is_empty())
        + usize::from(!profile.navigation.is_empty());
    #[allow(clippy::cast_precision_loss)]
    let base = inputs as f32 / 3.0;
    let signal_factor = if has_signal { 1.0 } else { 0.4 };
    (base * signal_factor).clamp(0.0, 1.0)
}
