//! Ticker extraction from free text.

use std::collections::BTreeSet;

use regex::Regex;

/// Upper-case tokens that look like tickers but never are.
const FALSE_POSITIVES: &[&str] = &[
    "US", "USA", "UK", "EU", "CEO", "CFO", "IPO", "ETF", "GDP", "API", "SEC", "FDA", "FTC", "FBI",
    "CIA", "IRS", "LLC", "INC", "CORP", "LTD",
];

/// Finds tickers written as `$AAPL`, `AAPL stock`, `(NASDAQ: AAPL)` or `AAPL Inc`.
#[derive(Debug, Clone)]
pub struct SymbolExtractor {
    patterns: Vec<Regex>,
}

impl SymbolExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = [
            r"\$([A-Za-z]{1,5})\b",
            r"\b([A-Z]{2,5})\s+(?i:stock|shares|equity)\b",
            r"\((?i:NYSE|NASDAQ|AMEX):\s*([A-Za-z]{1,5})\)",
            r"\b([A-Z]{2,5})\s+(?i:Inc|Corp|Ltd|Co)\b",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Distinct upper-case tickers found in `text`, sorted.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut found = BTreeSet::new();
        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    let symbol = m.as_str().to_ascii_uppercase();
                    if !FALSE_POSITIVES.contains(&symbol.as_str()) {
                        found.insert(symbol);
                    }
                }
            }
        }
        found.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns() {
        let extractor = SymbolExtractor::new().unwrap();

        assert_eq!(extractor.extract("loading up on $tqqq today"), vec!["TQQQ"]);
        assert_eq!(extractor.extract("SOXL shares ripping"), vec!["SOXL"]);
        assert_eq!(extractor.extract("Vertex (NASDAQ: VRTX) jumps"), vec!["VRTX"]);
        assert_eq!(extractor.extract("ACME Corp announces buyback"), vec!["ACME"]);
    }

    #[test]
    fn test_false_positives_and_duplicates() {
        let extractor = SymbolExtractor::new().unwrap();

        let found = extractor.extract("$LABU up, the CEO said LABU stock and $FDA news; US shares");
        assert_eq!(found, vec!["LABU"]);
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("nothing to see here").is_empty());
    }
}
