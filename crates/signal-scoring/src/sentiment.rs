//! Lexicon and rule based text polarity.
//!
//! Each known word contributes its valence, adjusted by nearby intensifiers,
//! negations, capitalisation and a contrastive "but". The summed valence is
//! squashed into [-1, 1] with `s / sqrt(s² + 15)`.

use std::collections::HashMap;

use crate::lexicon::{BOOSTERS, EMOJI, NEGATIONS, WORDS};

const NORMALIZATION_ALPHA: f64 = 15.0;
const CAPS_EMPHASIS: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_EMPHASIS: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const BUT_BEFORE: f64 = 0.5;
const BUT_AFTER: f64 = 1.5;
/// How far back intensifiers and negations reach.
const LOOKBACK: usize = 3;

#[derive(Debug)]
struct Token<'a> {
    raw: &'a str,
    lower: String,
    is_emoji: bool,
}

impl Token<'_> {
    fn is_shouting(&self) -> bool {
        self.raw.chars().any(char::is_alphabetic)
            && self.raw.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
            && self.raw.chars().count() > 1
    }
}

/// Stateless polarity scorer. Cheap to share; build once per process.
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    words: HashMap<&'static str, f64>,
    emoji: HashMap<char, f64>,
    boosters: HashMap<&'static str, f64>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            words: WORDS.iter().copied().collect(),
            emoji: EMOJI.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
        }
    }

    /// Compound polarity of one text in [-1, 1]. Blank text scores 0.0.
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens = self.tokenize(text);
        if tokens.is_empty() {
            return 0.0;
        }

        let alpha_tokens = tokens.iter().filter(|t| !t.is_emoji).count();
        let shouting = tokens.iter().filter(|t| t.is_shouting()).count();
        let caps_differential = shouting > 0 && shouting < alpha_tokens;

        let but_index = tokens.iter().position(|t| t.lower == "but");

        let mut sum = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = self.valence(token) else {
                continue;
            };

            if caps_differential && token.is_shouting() {
                valence += CAPS_EMPHASIS * valence.signum();
            }

            for distance in 1..=LOOKBACK.min(i) {
                let prev = &tokens[i - distance];
                if let Some(&boost) = self.boosters.get(prev.lower.as_str()) {
                    let mut scalar = boost * (1.0 - 0.05 * (distance - 1) as f64);
                    if caps_differential && prev.is_shouting() {
                        scalar += CAPS_EMPHASIS * scalar.signum();
                    }
                    valence += scalar * valence.signum();
                }
            }

            if (1..=LOOKBACK.min(i)).any(|d| is_negation(&tokens[i - d].lower)) {
                valence *= NEGATION_SCALAR;
            }

            if let Some(b) = but_index {
                if i < b {
                    valence *= BUT_BEFORE;
                } else if i > b {
                    valence *= BUT_AFTER;
                }
            }

            sum += valence;
        }

        if sum != 0.0 {
            let bangs = text.chars().filter(|&c| c == '!').count().min(MAX_EXCLAMATIONS);
            sum += bangs as f64 * EXCLAMATION_EMPHASIS * sum.signum();
        }

        normalize(sum)
    }

    /// Polarity of every text, in input order.
    pub fn score_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<f64> {
        texts.iter().map(|t| self.polarity(t.as_ref())).collect()
    }

    /// Mean polarity over a corpus; 0.0 when the corpus is empty.
    pub fn mean_compound<S: AsRef<str>>(&self, texts: &[S]) -> f64 {
        if texts.is_empty() {
            return 0.0;
        }
        let total: f64 = texts.iter().map(|t| self.polarity(t.as_ref())).sum();
        (total / texts.len() as f64).clamp(-1.0, 1.0)
    }

    fn valence(&self, token: &Token<'_>) -> Option<f64> {
        if token.is_emoji {
            return token.raw.chars().next().and_then(|c| self.emoji.get(&c)).copied();
        }
        if self.boosters.contains_key(token.lower.as_str()) {
            return None;
        }
        self.words.get(token.lower.as_str()).copied()
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        for word in text.split_whitespace() {
            let mut start = 0;
            for (idx, c) in word.char_indices() {
                if self.emoji.contains_key(&c) {
                    push_word(&mut tokens, &word[start..idx]);
                    let end = idx + c.len_utf8();
                    tokens.push(Token {
                        raw: &word[idx..end],
                        lower: String::new(),
                        is_emoji: true,
                    });
                    start = end;
                }
            }
            push_word(&mut tokens, &word[start..]);
        }
        tokens
    }
}

fn push_word<'a>(tokens: &mut Vec<Token<'a>>, word: &'a str) {
    let raw = word.trim_matches(|c: char| c.is_ascii_punctuation() || c == '’' || c == '‘');
    if raw.is_empty() {
        return;
    }
    let lower = raw
        .to_lowercase()
        .chars()
        .filter(|&c| c != '\'' && c != '’')
        .collect();
    tokens.push(Token {
        raw,
        lower,
        is_emoji: false,
    });
}

fn is_negation(lower: &str) -> bool {
    NEGATIONS.contains(&lower) || (lower.len() > 3 && lower.ends_with("nt") && lower != "want" && {
        // contractions lose their apostrophe during tokenization: "doesn't" -> "doesnt"
        matches!(
            &lower[..lower.len() - 2],
            "should" | "could" | "would" | "has" | "have" | "had" | "must" | "need" | "did"
                | "does" | "do" | "is" | "are" | "was" | "were"
        )
    })
}

fn normalize(sum: f64) -> f64 {
    if sum == 0.0 || !sum.is_finite() {
        return 0.0;
    }
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_blank_is_neutral() {
        let analyzer = SentimentAnalyzer::new();

        assert_eq!(analyzer.polarity(""), 0.0);
        assert_eq!(analyzer.polarity("   \t\n"), 0.0);
        assert_eq!(analyzer.polarity("the ticker is TQQQ"), 0.0);
    }

    #[test]
    fn test_polarity_direction() {
        let analyzer = SentimentAnalyzer::new();

        assert!(analyzer.polarity("Amazing! 🚀") > 0.5);
        assert!(analyzer.polarity("Terrible crash") < -0.5);
        assert!(analyzer.polarity("TQQQ looks bullish, strong breakout") > 0.0);
    }

    #[test]
    fn test_negation_flips() {
        let analyzer = SentimentAnalyzer::new();

        assert!(analyzer.polarity("this is good") > 0.0);
        assert!(analyzer.polarity("this is not good") < 0.0);
        assert!(analyzer.polarity("this isn't good") < 0.0);
    }

    #[test]
    fn test_boosters_and_emphasis() {
        let analyzer = SentimentAnalyzer::new();
        let plain = analyzer.polarity("good earnings");

        assert!(analyzer.polarity("very good earnings") > plain);
        assert!(analyzer.polarity("slightly good earnings") < plain);
        assert!(analyzer.polarity("good earnings!!") > plain);
        assert!(analyzer.polarity("GOOD earnings") > plain);
    }

    #[test]
    fn test_but_shifts_weight() {
        let analyzer = SentimentAnalyzer::new();

        assert!(analyzer.polarity("the product is good but the stock is terrible") < 0.0);
        assert!(analyzer.polarity("the quarter was bad but guidance is great") > 0.0);
    }

    #[test]
    fn test_emoji_inside_word() {
        let analyzer = SentimentAnalyzer::new();
        assert!(analyzer.polarity("TQQQ🚀🚀") > 0.0);
    }

    #[test]
    fn test_deterministic() {
        let analyzer = SentimentAnalyzer::new();
        let text = "Really excited about SOXL but worried about the selloff";
        assert_eq!(analyzer.polarity(text), analyzer.polarity(text));
    }

    #[test]
    fn test_mean_compound() {
        let analyzer = SentimentAnalyzer::new();
        let empty: [&str; 0] = [];

        assert_eq!(analyzer.mean_compound(&empty), 0.0);

        let texts = ["great", "terrible", ""];
        let scores = analyzer.score_all(&texts);
        let mean = analyzer.mean_compound(&texts);
        assert_eq!(scores.len(), 3);
        assert!((mean - scores.iter().sum::<f64>() / 3.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_polarity_bounded(text in ".*") {
            let score = SentimentAnalyzer::new().polarity(&text);
            prop_assert!(score.is_finite());
            prop_assert!((-1.0..=1.0).contains(&score));
        }

        #[test]
        fn prop_whitespace_is_neutral(text in "[ \t\n]*") {
            prop_assert_eq!(SentimentAnalyzer::new().polarity(&text), 0.0);
        }
    }
}
