//! Corpus assembly and term frequency helpers shared by the analyzers.

use std::collections::HashMap;

use storescope_core::BrandProfile;

use crate::lexicon::is_stopword;

/// Per-source caps keep one verbose field from drowning out the rest.
pub(crate) const MAX_FAQ_ENTRIES: usize = 10;
pub(crate) const MAX_PRODUCT_DESCRIPTIONS: usize = 15;
pub(crate) const MAX_DESCRIPTION_CHARS: usize = 200;
pub(crate) const MAX_CORPUS_CHARS: usize = 2000;

/// Concatenates brand narrative, policy texts, product descriptions, and FAQ
/// text into the sentiment corpus, bounded to [`MAX_CORPUS_CHARS`].
pub(crate) fn sentiment_corpus(profile: &BrandProfile) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(narrative) = &profile.brand_text_context {
        parts.push(narrative.clone());
    }
    for text in profile.policies.values() {
        parts.push(text.clone());
    }
    for product in profile.product_catalog.iter().take(MAX_PRODUCT_DESCRIPTIONS) {
        if let Some(description) = &product.description {
            parts.push(truncate_at_boundary(description, MAX_DESCRIPTION_CHARS).to_owned());
        }
    }
    for faq in profile.faqs.iter().take(MAX_FAQ_ENTRIES) {
        parts.push(faq.question.clone());
        parts.push(faq.answer.clone());
    }

    let corpus = parts.join(" ");
    truncate_at_boundary(&corpus, MAX_CORPUS_CHARS).to_owned()
}

/// Most frequent non-stopword terms (length > 3, alphabetic) across `texts`,
/// ties broken alphabetically for determinism.
pub(crate) fn top_terms<'a, I>(texts: I, n: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for word in text.split(|c: char| !c.is_alphabetic()) {
            let word = word.to_lowercase();
            if word.len() <= 3 || is_stopword(&word) {
                continue;
            }
            *counts.entry(word).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(n).map(|(term, _)| term).collect()
}

/// Counts whole-word occurrences, lowercased, for lexicon matching.
pub(crate) fn word_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in text.split(|c: char| !c.is_alphabetic()) {
        if word.is_empty() {
            continue;
        }
        *counts.entry(word.to_lowercase()).or_default() += 1;
    }
    counts
}

/// Truncates to at most `max` bytes without splitting a UTF-8 character.
fn truncate_at_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let cut = (0..=max)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    &text[..cut]
}
