//! Commerce-domain lexicons for polarity scoring and persona matching.

/// Word weights for polarity scoring.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const POLARITY_LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("best", 0.5),
    ("love", 0.5),
    ("loved", 0.5),
    ("quality", 0.3),
    ("premium", 0.3),
    ("beautiful", 0.4),
    ("perfect", 0.5),
    ("comfortable", 0.3),
    ("durable", 0.3),
    ("handcrafted", 0.3),
    ("trusted", 0.4),
    ("happy", 0.4),
    ("easy", 0.3),
    ("fast", 0.3),
    ("friendly", 0.3),
    ("guarantee", 0.3),
    ("guaranteed", 0.3),
    ("recommend", 0.4),
    ("sustainable", 0.3),
    ("favorite", 0.4),
    ("careful", 0.2),
    ("honest", 0.3),
    // Negative signals
    ("bad", -0.4),
    ("poor", -0.4),
    ("terrible", -0.6),
    ("worst", -0.6),
    ("broken", -0.5),
    ("damaged", -0.5),
    ("defective", -0.6),
    ("delay", -0.3),
    ("delayed", -0.3),
    ("late", -0.3),
    ("problem", -0.3),
    ("complaint", -0.4),
    ("disappointing", -0.5),
    ("disappointed", -0.5),
    ("cancel", -0.3),
    ("cancelled", -0.3),
    ("scam", -0.7),
    ("fake", -0.6),
    ("issue", -0.3),
    ("never", -0.2),
];

/// Score a text string using the polarity lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps
/// the result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn polarity_score(text: &str) -> f32 {
    let mut score = 0.0_f32;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        for &(lex_word, weight) in POLARITY_LEXICON {
            if w == lex_word {
                score += weight;
                break;
            }
        }
    }
    score.clamp(-1.0, 1.0)
}

/// Persona keyword sets scored by the marketing analyzer. Weights reflect
/// how strongly a term indicates the persona.
pub(crate) const PERSONA_LEXICONS: &[(&str, &[(&str, f32)])] = &[
    (
        "young-casual",
        &[
            ("trendy", 1.0),
            ("fun", 0.8),
            ("cool", 0.8),
            ("vibe", 1.0),
            ("vibes", 1.0),
            ("bold", 0.7),
            ("fresh", 0.6),
            ("playful", 0.9),
            ("street", 0.8),
            ("casual", 0.8),
            ("everyday", 0.5),
        ],
    ),
    (
        "premium-luxury",
        &[
            ("luxury", 1.0),
            ("premium", 0.9),
            ("exclusive", 0.9),
            ("handcrafted", 0.8),
            ("bespoke", 1.0),
            ("refined", 0.8),
            ("elegant", 0.8),
            ("sophisticated", 0.9),
            ("heritage", 0.7),
            ("artisan", 0.8),
        ],
    ),
    (
        "professional-b2b",
        &[
            ("business", 0.8),
            ("professional", 0.9),
            ("enterprise", 1.0),
            ("solution", 0.7),
            ("solutions", 0.7),
            ("productivity", 0.9),
            ("office", 0.7),
            ("corporate", 0.9),
            ("workflow", 0.9),
            ("reliable", 0.6),
            ("compliance", 0.9),
        ],
    ),
    (
        "eco-conscious",
        &[
            ("sustainable", 1.0),
            ("eco", 0.9),
            ("organic", 0.8),
            ("recycled", 0.9),
            ("planet", 0.8),
            ("green", 0.6),
            ("ethical", 0.8),
            ("responsibly", 0.8),
            ("carbon", 0.8),
            ("natural", 0.5),
        ],
    ),
];

/// Words excluded from theme and keyword frequency counting.
pub(crate) const STOPWORDS: &[&str] = &[
    "about", "after", "again", "all", "and", "any", "are", "because", "been", "before", "being",
    "between", "both", "but", "can", "could", "did", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "her", "here", "him", "his",
    "how", "into", "its", "itself", "just", "more", "most", "not", "now", "off", "once", "only",
    "other", "our", "ours", "out", "over", "own", "same", "she", "should", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "through",
    "too", "under", "until", "very", "was", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
];

pub(crate) fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}
