//! Positive-catalyst detection over a text corpus.
//!
//! A text counts as a catalyst when it mentions a discrete positive business
//! event: regulatory approval, M&A, an earnings or revenue beat, a guidance
//! raise, a partnership, or late-stage clinical trial language.

use regex::{RegexSet, RegexSetBuilder};

const PATTERNS: &[&str] = &[
    r"\bFDA\b",
    r"\bapproval\b",
    r"\bPDUFA\b",
    r"\bphase\s*(III|3)\b",
    r"\bM&A\b|\bmerger\b|\bacquisition\b|\bbuyout\b",
    r"\bearnings\b\s*(beat|surprise|smash)\b",
    r"\bEPS\b\s*(beat|surprise)\b",
    r"\brevenue\b\s*(beat|record)\b",
    r"\bguidance\b\s*(raise|raised|hike)\b",
    r"\bpartnership\b|\bcontract\b|\bdeal\b",
];

/// Case-insensitive catalyst matcher.
#[derive(Debug, Clone)]
pub struct CatalystScorer {
    patterns: RegexSet,
}

impl CatalystScorer {
    /// Compile the catalyst pattern set.
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = RegexSetBuilder::new(PATTERNS)
            .case_insensitive(true)
            .build()?;
        Ok(Self { patterns })
    }

    /// Whether a single text mentions any catalyst.
    pub fn is_catalyst(&self, text: &str) -> bool {
        !text.is_empty() && self.patterns.is_match(text)
    }

    /// Fraction of texts carrying at least one catalyst, in [0, 1].
    ///
    /// Empty strings count toward the total but never match; an empty
    /// corpus scores 0.0.
    pub fn score<S: AsRef<str>>(&self, texts: &[S]) -> f64 {
        if texts.is_empty() {
            return 0.0;
        }
        let hits = texts.iter().filter(|t| self.is_catalyst(t.as_ref())).count();
        (hits as f64 / texts.len() as f64).clamp(0.0, 1.0)
    }

    /// Whether any text in the corpus carries a catalyst.
    pub fn any<S: AsRef<str>>(&self, texts: &[S]) -> bool {
        texts.iter().any(|t| self.is_catalyst(t.as_ref()))
    }
}
