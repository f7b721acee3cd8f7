//! Rule-based ticket classifier.
//!
//! A deterministic stand-in for a future probabilistic model. The
//! two-field output contract (`category`, `confidence`) is the stable
//! seam: swapping in a statistical backend means providing another
//! [`Classifier`] implementation, never touching the decision policy.

use serde::{Deserialize, Serialize};

use crate::types::Category;

// ---------------------------------------------------------------------------
// Classification (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    /// Fixed constant per rule — not computed. A probabilistic replacement
    /// fills this with a real score in the same 0.0–1.0 range.
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Classifier trait
// ---------------------------------------------------------------------------

/// Maps ticket free text to a category and confidence. Pure function of
/// the input text: no side effects, no stored state between calls.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Classification;
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// One keyword rule. Rules are evaluated in order; the first whose
/// vocabulary matches wins.
pub struct Rule {
    pub category: Category,
    pub confidence: f64,
    pub keywords: &'static [&'static str],
}

pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            category: Category::Billing,
            confidence: 0.90,
            keywords: &["refund", "invoice"],
        },
        Rule {
            category: Category::Tech,
            confidence: 0.85,
            keywords: &["error", "bug", "stack"],
        },
        Rule {
            category: Category::Shipping,
            confidence: 0.80,
            keywords: &["shipment", "delivery"],
        },
    ]
}

// ---------------------------------------------------------------------------
// KeywordClassifier
// ---------------------------------------------------------------------------

pub struct KeywordClassifier {
    rules: Vec<Rule>,
}

impl KeywordClassifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Classification {
        let lc = text.to_lowercase();
        for rule in &self.rules {
            if rule.keywords.iter().any(|kw| lc.contains(kw)) {
                return Classification {
                    category: rule.category,
                    confidence: rule.confidence,
                };
            }
        }

        // Fallback: unrecognized text lands in the catch-all bucket
        Classification {
            category: Category::Other,
            confidence: 0.60,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Classification {
        KeywordClassifier::default().classify(text)
    }

    #[test]
    fn billing_vocabulary() {
        let c = classify("I was charged twice for invoice #12345, need refund");
        assert_eq!(c.category, Category::Billing);
        assert_eq!(c.confidence, 0.90);
    }

    #[test]
    fn tech_vocabulary() {
        let c = classify("The app shows an error and a stack trace on login");
        assert_eq!(c.category, Category::Tech);
        assert_eq!(c.confidence, 0.85);
    }

    #[test]
    fn shipping_vocabulary() {
        let c = classify("My delivery never arrived, where is the shipment?");
        assert_eq!(c.category, Category::Shipping);
        assert_eq!(c.confidence, 0.80);
    }

    #[test]
    fn fallback_is_other() {
        let c = classify("I have a question about your services");
        assert_eq!(c.category, Category::Other);
        assert_eq!(c.confidence, 0.60);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let c = classify("REFUND my INVOICE please");
        assert_eq!(c.category, Category::Billing);
    }

    #[test]
    fn first_matching_rule_wins() {
        // Matches billing, tech and shipping vocabulary; billing is first.
        let c = classify("refund for the buggy delivery");
        assert_eq!(c.category, Category::Billing);
        assert_eq!(c.confidence, 0.90);
    }

    #[test]
    fn empty_text_falls_through() {
        let c = classify("");
        assert_eq!(c.category, Category::Other);
        assert_eq!(c.confidence, 0.60);
    }
}
