// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Category assigned to questions whose category is blank or missing.
pub const FALLBACK_CATEGORY: &str = "Other";

/// A single record of the static question bank. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Question {
    #[serde(default)]
    pub id: Option<i64>,

    /// The text of the question.
    #[validate(length(min = 1, message = "question text cannot be empty"))]
    pub question: String,

    /// Answer choices, in bank order. Shuffled per session when displayed.
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,

    /// Must match one of `options` (case-insensitive, trimmed).
    pub correct_answer: String,

    #[serde(default)]
    pub explanation: String,

    /// Attribution (FATF, IMF, ...).
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub category: String,
}

impl Question {
    /// Field checks plus the cross-field rule that the correct answer is one of the options.
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())?;

        let expected = normalize_answer(&self.correct_answer);
        if !self.options.iter().any(|o| normalize_answer(o) == expected) {
            return Err(format!(
                "correct answer '{}' is not one of the options",
                self.correct_answer
            ));
        }
        Ok(())
    }

    /// Case-insensitive, whitespace-trimmed comparison against the correct answer.
    pub fn is_correct(&self, selected: &str) -> bool {
        normalize_answer(selected) == normalize_answer(&self.correct_answer)
    }
}

pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Trimmed category, or `FALLBACK_CATEGORY` when blank.
pub fn normalize_category(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        FALLBACK_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 {
        return Err(validator::ValidationError::new("at_least_two_options"));
    }
    let mut seen = std::collections::HashSet::new();
    for opt in options {
        let key = normalize_answer(opt);
        if key.is_empty() {
            return Err(validator::ValidationError::new("option_cannot_be_empty"));
        }
        if !seen.insert(key) {
            return Err(validator::ValidationError::new("duplicate_option"));
        }
    }
    Ok(())
}

/// DTO for sending a question to the player (excludes answer and explanation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    /// Zero-based position in the session.
    pub index: usize,
    pub number: usize,
    pub total: usize,
    pub question: String,
    pub options: Vec<String>,
    pub category: String,
}

/// Category listing entry.
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub question_count: usize,
}
