use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use super::category::Category;
use crate::locale::{Language, LocalizedText};

/// The largest weight a single option may carry for any one category. The
/// percentage normalization in the scorer assumes this bound; the bank is
/// validated against it at load time.
pub const MAX_OPTION_WEIGHT: u32 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: LocalizedText,
    #[serde(default)]
    pub weights: BTreeMap<Category, u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: LocalizedText,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

#[derive(Error, Debug)]
pub enum BankError {
    #[error("Invalid question bank JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(String),
    #[error("Question {0} has no options")]
    NoOptions(String),
    #[error("Duplicate option id {option} in question {question}")]
    DuplicateOption { question: String, option: String },
    #[error(
        "Weight {weight} for {category} in question {question} option {option} exceeds the maximum of {MAX_OPTION_WEIGHT}"
    )]
    WeightOutOfRange {
        question: String,
        option: String,
        category: Category,
        weight: u32,
    },
    #[error("Question {0} is missing English text")]
    MissingEnglish(String),
}

/// The fixed assessment question bank. Loaded once at startup, validated
/// eagerly, and shared read-only for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: IndexMap<String, Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        let mut validated = IndexMap::with_capacity(questions.len());

        for question in questions {
            if question.options.is_empty() {
                return Err(BankError::NoOptions(question.id));
            }
            if !question.prompt.has(Language::En) {
                return Err(BankError::MissingEnglish(question.id));
            }

            let mut option_ids = BTreeSet::new();
            for option in &question.options {
                if !option_ids.insert(option.id.clone()) {
                    return Err(BankError::DuplicateOption {
                        question: question.id.clone(),
                        option: option.id.clone(),
                    });
                }
                if !option.text.has(Language::En) {
                    return Err(BankError::MissingEnglish(question.id.clone()));
                }
                for (&category, &weight) in &option.weights {
                    if weight > MAX_OPTION_WEIGHT {
                        return Err(BankError::WeightOutOfRange {
                            question: question.id.clone(),
                            option: option.id.clone(),
                            category,
                            weight,
                        });
                    }
                }
            }

            let id = question.id.clone();
            if validated.insert(id.clone(), question).is_some() {
                return Err(BankError::DuplicateQuestion(id));
            }
        }

        Ok(QuestionBank {
            questions: validated,
        })
    }

    pub fn from_json(data: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(data)?;
        Self::new(questions)
    }

    /// The question set shipped with the binary.
    pub fn bundled() -> Result<Self, BankError> {
        Self::from_json(include_str!("../../assets/quiz-questions.json"))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, question_id: &str) -> Option<&Question> {
        self.questions.get(question_id)
    }

    /// Questions in bank order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    /// The denominator for percentage normalization: every question can
    /// contribute at most `MAX_OPTION_WEIGHT` to a category.
    pub fn max_possible_score(&self) -> u32 {
        self.questions.len() as u32 * MAX_OPTION_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, options: Vec<AnswerOption>) -> Question {
        Question {
            id: id.to_string(),
            prompt: LocalizedText::english(format!("Prompt {id}")),
            options,
        }
    }

    fn option(id: &str, weights: &[(Category, u32)]) -> AnswerOption {
        AnswerOption {
            id: id.to_string(),
            text: LocalizedText::english(format!("Option {id}")),
            weights: weights.iter().copied().collect(),
        }
    }

    #[test]
    fn bundled_bank_is_valid() {
        let bank = QuestionBank::bundled().unwrap();

        assert!(!bank.is_empty());
        assert_eq!(bank.max_possible_score(), bank.len() as u32 * 3);
    }

    #[test]
    fn rejects_duplicate_question_ids() {
        let result = QuestionBank::new(vec![
            question("1", vec![option("a", &[(Category::Science, 1)])]),
            question("1", vec![option("a", &[(Category::Arts, 1)])]),
        ]);

        assert!(matches!(result, Err(BankError::DuplicateQuestion(id)) if id == "1"));
    }

    #[test]
    fn rejects_duplicate_option_ids() {
        let result = QuestionBank::new(vec![question(
            "1",
            vec![
                option("a", &[(Category::Science, 1)]),
                option("a", &[(Category::Arts, 1)]),
            ],
        )]);

        assert!(matches!(result, Err(BankError::DuplicateOption { .. })));
    }

    #[test]
    fn rejects_weight_above_maximum() {
        let result = QuestionBank::new(vec![question(
            "1",
            vec![option("a", &[(Category::Medical, MAX_OPTION_WEIGHT + 1)])],
        )]);

        assert!(matches!(result, Err(BankError::WeightOutOfRange { weight: 4, .. })));
    }

    #[test]
    fn rejects_question_without_options() {
        let result = QuestionBank::new(vec![question("1", vec![])]);

        assert!(matches!(result, Err(BankError::NoOptions(id)) if id == "1"));
    }

    #[test]
    fn rejects_unknown_category_in_json() {
        let data = r#"[{
            "id": "1",
            "prompt": {"en": "Prompt"},
            "options": [{"id": "a", "text": {"en": "Option"}, "weights": {"sports": 2}}]
        }]"#;

        assert!(matches!(QuestionBank::from_json(data), Err(BankError::Parse(_))));
    }

    #[test]
    fn rejects_missing_english_prompt() {
        let data = r#"[{
            "id": "1",
            "prompt": {"hi": "प्रश्न"},
            "options": [{"id": "a", "text": {"en": "Option"}, "weights": {}}]
        }]"#;

        assert!(matches!(
            QuestionBank::from_json(data),
            Err(BankError::MissingEnglish(id)) if id == "1"
        ));
    }
}
