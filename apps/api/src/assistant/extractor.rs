//! Score/category extraction: pluggable strategy for pulling a `ScoreQuery`
//! out of free-form student text.
//!
//! Default: `FirstMatchExtractor` (first number, first category code anywhere in the text).
//! Alternative: `LabeledFieldExtractor` (prefers `marks: 185, category: BC` style fields).
//!
//! The classifier holds an `Arc<dyn ScoreExtractor>`, chosen at startup via config.

use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::CategoryCode;

/// A score and category parsed from a message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreQuery {
    pub score: f64,
    pub category: CategoryCode,
}

pub trait ScoreExtractor: Send + Sync {
    /// Returns `Some` only when both a score and a category were found.
    fn extract(&self, text: &str) -> Option<ScoreQuery>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

// NOTE: expect() is acceptable on these: the patterns are constants.
// Scores are ASCII digits bounded by non-digits on both sides, so "185marks"
// yields 185 while "2024" yields nothing. The value is capture group 1.
static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9.])([0-9]{1,3}(?:\.[0-9]+)?)(?:[^0-9]|$)")
        .expect("Invalid regex: score pattern")
});

static CATEGORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:oc|bcm|bc|mbc|sca|sc|st)\b").expect("Invalid regex: category pattern")
});

static LABELED_SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:marks?|scored?|cutoff)\b\s*(?:[:=]|is|of)?\s*([0-9]{1,3}(?:\.[0-9]+)?)(?:[^0-9]|$)",
    )
    .expect("Invalid regex: labeled score pattern")
});

static LABELED_CATEGORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:category|community|quota)\b\s*(?:[:=]|is)?\s*(oc|bcm|bc|mbc|sca|sc|st)\b")
        .expect("Invalid regex: labeled category pattern")
});

fn parse_score(captures: regex::Captures<'_>) -> Option<f64> {
    captures.get(1)?.as_str().parse().ok()
}

fn first_score(lowered: &str) -> Option<f64> {
    SCORE_PATTERN.captures_iter(lowered).find_map(parse_score)
}

fn first_category(lowered: &str) -> Option<CategoryCode> {
    CATEGORY_PATTERN
        .find(lowered)
        .and_then(|m| m.as_str().parse().ok())
}

// ────────────────────────────────────────────────────────────────────────────
// FirstMatchExtractor (default)
// ────────────────────────────────────────────────────────────────────────────

/// Takes the first numeric token (1–3 digits, optional decimal) and the first
/// whole-word category code in the lower-cased text.
///
/// "I am 18 and scored 190 in BC" extracts 18. Known limitation, kept as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstMatchExtractor;

impl ScoreExtractor for FirstMatchExtractor {
    fn extract(&self, text: &str) -> Option<ScoreQuery> {
        let lowered = text.to_lowercase();
        let score = first_score(&lowered)?;
        let category = first_category(&lowered)?;
        Some(ScoreQuery { score, category })
    }

    fn name(&self) -> &'static str {
        "first_match"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LabeledFieldExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Prefers values introduced by a label (`marks: 185`, `scored 190`,
/// `category BC`, `community = mbc`). A field with no label falls back to its
/// first occurrence, as in `FirstMatchExtractor`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LabeledFieldExtractor;

impl ScoreExtractor for LabeledFieldExtractor {
    fn extract(&self, text: &str) -> Option<ScoreQuery> {
        let lowered = text.to_lowercase();

        let score = LABELED_SCORE_PATTERN
            .captures_iter(&lowered)
            .find_map(parse_score)
            .or_else(|| first_score(&lowered))?;

        let category = LABELED_CATEGORY_PATTERN
            .captures(&lowered)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .or_else(|| first_category(&lowered))?;

        Some(ScoreQuery { score, category })
    }

    fn name(&self) -> &'static str {
        "labeled"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionStrategy {
    #[default]
    FirstMatch,
    Labeled,
}

impl FromStr for ExtractionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_match" | "first-match" => Ok(Self::FirstMatch),
            "labeled" | "labelled" => Ok(Self::Labeled),
            other => Err(format!(
                "Unknown extraction strategy '{other}' (expected first_match or labeled)"
            )),
        }
    }
}

pub fn build_extractor(strategy: ExtractionStrategy) -> Arc<dyn ScoreExtractor> {
    match strategy {
        ExtractionStrategy::FirstMatch => Arc::new(FirstMatchExtractor),
        ExtractionStrategy::Labeled => Arc::new(LabeledFieldExtractor),
    }
}
