//! FAQ extraction: paired question/answer blocks under a recognizable
//! FAQ/help/accordion section, with a heading-followed-by-body fallback.

use scraper::{ElementRef, Html, Selector};

use storescope_core::FaqEntry;

use super::text::element_text;
use crate::normalize::absolutize_same_host;

/// Extracts question/answer pairs from FAQ-ish sections of the document.
#[must_use]
pub fn extract_faqs(doc: &Html) -> Vec<FaqEntry> {
    let Ok(section_sel) = Selector::parse(
        r#"[class*="faq"], [id*="faq"], [class*="accordion"], [class*="help-center"]"#,
    ) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for section in doc.select(&section_sel) {
        collect_from_section(&section, &mut entries);
    }
    dedup_by_question(entries)
}

/// Extracts FAQs from a dedicated FAQ page fetched as a follow-up.
///
/// Tries the section heuristics first, then falls back to pairing every
/// `?`-bearing heading on the page with its following block.
#[must_use]
pub fn extract_faq_page(html: &str) -> Vec<FaqEntry> {
    let doc = Html::parse_document(html);
    let entries = extract_faqs(&doc);
    if !entries.is_empty() {
        return entries;
    }

    let Ok(heading_sel) = Selector::parse("h2, h3, h4, h5, h6") else {
        return Vec::new();
    };
    let mut entries = Vec::new();
    for heading in doc.select(&heading_sel) {
        push_heading_pair(&heading, &mut entries);
    }
    dedup_by_question(entries)
}

/// First same-host link that looks like it leads to a FAQ/help page.
#[must_use]
pub fn faq_link(doc: &Html, base_url: &str) -> Option<String> {
    let anchor_sel = Selector::parse("a[href]").ok()?;
    for anchor in doc.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href_lower = href.to_lowercase();
        let text = element_text(&anchor).to_lowercase();
        let matched = ["faq", "frequently-asked", "frequently asked", "help"]
            .iter()
            .any(|kw| href_lower.contains(kw) || text.contains(kw));
        if matched {
            if let Some(absolute) = absolutize_same_host(base_url, href) {
                return Some(absolute);
            }
        }
    }
    None
}

fn collect_from_section(section: &ElementRef, entries: &mut Vec<FaqEntry>) {
    let Ok(question_sel) =
        Selector::parse(r#"[class*="question"], [class*="accordion-header"], summary"#)
    else {
        return;
    };
    let Ok(answer_sel) =
        Selector::parse(r#"[class*="answer"], [class*="accordion-content"], [class*="accordion-body"]"#)
    else {
        return;
    };

    let questions: Vec<String> = section
        .select(&question_sel)
        .map(|el| element_text(&el))
        .collect();
    let answers: Vec<String> = section
        .select(&answer_sel)
        .map(|el| element_text(&el))
        .collect();

    for (question, answer) in questions.iter().zip(answers.iter()) {
        if !question.is_empty() && !answer.is_empty() {
            entries.push(FaqEntry {
                question: question.clone(),
                answer: answer.clone(),
            });
        }
    }

    // Headings phrased as questions, answered by the next sibling block.
    let Ok(heading_sel) = Selector::parse("h2, h3, h4, h5, h6") else {
        return;
    };
    for heading in section.select(&heading_sel) {
        push_heading_pair(&heading, entries);
    }
}

fn push_heading_pair(heading: &ElementRef, entries: &mut Vec<FaqEntry>) {
    let question = element_text(heading);
    if !question.contains('?') {
        return;
    }
    let answer = heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| matches!(el.value().name(), "p" | "div"))
        .map(|el| element_text(&el));
    if let Some(answer) = answer.filter(|a| !a.is_empty()) {
        entries.push(FaqEntry { question, answer });
    }
}

fn dedup_by_question(entries: Vec<FaqEntry>) -> Vec<FaqEntry> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.question.to_lowercase()))
        .collect()
}
