//! Intent Classifier: turns raw student text into a reply.
//!
//! Rules are checked in a fixed order and the first match wins:
//! 1. greeting token → greeting
//! 2. well-being phrase → small talk
//! 3. score + category extracted → Cutoff Matcher
//! 4. mentions college / engineering / cutoff → ask for score and category
//! 5. anything else → help
//!
//! `classify` is total: no input (including empty text) produces an error.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assistant::extractor::{ScoreExtractor, ScoreQuery};
use crate::assistant::replies;
use crate::catalog::matcher::match_cutoffs;
use crate::catalog::{Catalog, Suggestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    SmallTalk,
    ScoreQuery,
    CollegeQuestion,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub intent: Intent,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
}

impl Reply {
    fn canned(intent: Intent, content: &str) -> Self {
        Self {
            intent,
            content: content.to_string(),
            suggestions: None,
        }
    }
}

static GREETING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:hi|hello|hey)\b").expect("Invalid regex: greeting pattern")
});

const WELL_BEING_PHRASES: &[&str] = &["how are you", "how do you do"];
const COLLEGE_KEYWORDS: &[&str] = &["college", "engineering", "cutoff"];

/// Applies the ordered rule list to lower-cased text. Only the presence of an
/// extracted query matters here, not its values.
fn detect_intent(lowered: &str, query: Option<ScoreQuery>) -> Intent {
    if GREETING_PATTERN.is_match(lowered) {
        Intent::Greeting
    } else if WELL_BEING_PHRASES.iter().any(|p| lowered.contains(p)) {
        Intent::SmallTalk
    } else if query.is_some() {
        Intent::ScoreQuery
    } else if COLLEGE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Intent::CollegeQuestion
    } else {
        Intent::Unknown
    }
}

pub struct IntentClassifier {
    catalog: Arc<Catalog>,
    extractor: Arc<dyn ScoreExtractor>,
}

impl IntentClassifier {
    pub fn new(catalog: Arc<Catalog>, extractor: Arc<dyn ScoreExtractor>) -> Self {
        Self { catalog, extractor }
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    pub fn classify(&self, text: &str) -> Reply {
        let lowered = text.to_lowercase();
        let query = self.extractor.extract(text);
        let intent = detect_intent(&lowered, query);
        debug!(?intent, ?query, "Classified message");

        match (intent, query) {
            (Intent::ScoreQuery, Some(query)) => self.answer_score_query(query),
            (Intent::Greeting, _) => Reply::canned(intent, replies::GREETING),
            (Intent::SmallTalk, _) => Reply::canned(intent, replies::SMALL_TALK),
            (Intent::CollegeQuestion, _) => Reply::canned(intent, replies::SCORE_PROMPT),
            _ => Reply::canned(Intent::Unknown, replies::HELP),
        }
    }

    fn answer_score_query(&self, query: ScoreQuery) -> Reply {
        let ScoreQuery { score, category } = query;
        let suggestions = match_cutoffs(score, category, &self.catalog);

        if suggestions.is_empty() {
            return Reply {
                intent: Intent::ScoreQuery,
                content: format!(
                    "I couldn't find any college branches with a {category} cutoff at or below {score}. {}",
                    replies::NO_MATCH_ALTERNATIVES
                ),
                suggestions: None,
            };
        }

        let noun = if suggestions.len() == 1 {
            "option"
        } else {
            "options"
        };
        Reply {
            intent: Intent::ScoreQuery,
            content: format!(
                "Based on your score of {score} in the {category} category, I found {} {noun} for you:",
                suggestions.len()
            ),
            suggestions: Some(suggestions),
        }
    }
}
