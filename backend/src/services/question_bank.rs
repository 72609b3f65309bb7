// src/services/question_bank.rs

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::{
    error::QuizError,
    models::question::{CategorySummary, Question, normalize_category},
};

/// The two accepted bank layouts: a flat list of records, or records keyed by category.
#[derive(Deserialize)]
#[serde(untagged)]
enum BankFile {
    Flat(Vec<Question>),
    ByCategory(BTreeMap<String, Vec<Question>>),
}

/// Reads and validates the static question bank.
///
/// A missing file, unparsable JSON, or any invalid record fails the whole load.
pub fn load_questions(path: impl AsRef<Path>) -> Result<Vec<Question>, QuizError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| QuizError::Data(format!("cannot read {}: {}", path.display(), e)))?;
    parse_questions(&raw)
}

pub fn parse_questions(raw: &str) -> Result<Vec<Question>, QuizError> {
    let file: BankFile = serde_json::from_str(raw)
        .map_err(|e| QuizError::Data(format!("malformed question bank: {}", e)))?;

    let questions = match file {
        BankFile::Flat(questions) => questions,
        BankFile::ByCategory(groups) => groups
            .into_iter()
            .flat_map(|(key, records)| {
                records.into_iter().map(move |mut q| {
                    if q.category.trim().is_empty() {
                        q.category = key.clone();
                    }
                    q
                })
            })
            .collect(),
    };

    for (position, question) in questions.iter().enumerate() {
        question.check().map_err(|reason| {
            QuizError::Data(format!(
                "invalid question #{} ({:?}): {}",
                position + 1,
                question.question,
                reason
            ))
        })?;
    }

    Ok(questions)
}

/// Groups questions by trimmed category; blank categories land in "Other".
/// Every question ends up in exactly one group and keeps its bank order.
pub fn group_by_category(questions: Vec<Question>) -> BTreeMap<String, Vec<Question>> {
    let mut groups: BTreeMap<String, Vec<Question>> = BTreeMap::new();
    for mut question in questions {
        let key = normalize_category(&question.category);
        question.category = key.clone();
        groups.entry(key).or_default().push(question);
    }
    groups
}

/// Question pools by category, loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    pools: BTreeMap<String, Vec<Question>>,
}

impl QuestionBank {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        Ok(Self::from_questions(load_questions(path)?))
    }

    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self {
            pools: group_by_category(questions),
        }
    }

    /// Pool for a category, matched after trimming.
    pub fn pool(&self, category: &str) -> Option<&[Question]> {
        self.pools.get(category.trim()).map(Vec::as_slice)
    }

    pub fn categories(&self) -> Vec<CategorySummary> {
        self.pools
            .iter()
            .map(|(name, questions)| CategorySummary {
                name: name.clone(),
                question_count: questions.len(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
