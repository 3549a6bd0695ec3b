use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::bank::QuestionBank;
use super::category::Category;

/// Minimum percentage a stream must reach before its recommendation is
/// surfaced to the student.
pub const RECOMMEND_THRESHOLD: u8 = 70;

/// Only the strongest streams are considered for recommendations.
pub const TOP_STREAMS: usize = 3;

pub const FALLBACK_RECOMMENDATION: &str =
    "Consider exploring multiple streams to find your best fit";

/// Selected option per question, keyed by question id. Partial answer sets
/// are valid; an unanswered question contributes zero to every stream.
pub type AnswerSet = BTreeMap<String, String>;

/// Percentage score per stream, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamScores {
    pub science: u8,
    pub engineering: u8,
    pub medical: u8,
    pub commerce: u8,
    pub arts: u8,
    pub vocational: u8,
}

impl StreamScores {
    pub fn get(&self, category: Category) -> u8 {
        match category {
            Category::Science => self.science,
            Category::Engineering => self.engineering,
            Category::Medical => self.medical,
            Category::Commerce => self.commerce,
            Category::Arts => self.arts,
            Category::Vocational => self.vocational,
        }
    }

    fn set(&mut self, category: Category, value: u8) {
        match category {
            Category::Science => self.science = value,
            Category::Engineering => self.engineering = value,
            Category::Medical => self.medical = value,
            Category::Commerce => self.commerce = value,
            Category::Arts => self.arts = value,
            Category::Vocational => self.vocational = value,
        }
    }

    /// The six `(stream, percentage)` pairs in declaration order, which is
    /// also the tie-break order when ranking.
    pub fn entries(&self) -> [(Category, u8); 6] {
        [
            (Category::Science, self.science),
            (Category::Engineering, self.engineering),
            (Category::Medical, self.medical),
            (Category::Commerce, self.commerce),
            (Category::Arts, self.arts),
            (Category::Vocational, self.vocational),
        ]
    }
}

/// Scores an answer set against the question bank.
///
/// Pure and deterministic: the same bank and answers always produce the
/// same scores. Answers referencing an unknown question or an option the
/// question does not have are ignored, so any subset of the bank may be
/// answered.
pub fn score(bank: &QuestionBank, answers: &AnswerSet) -> StreamScores {
    let mut totals = [0u32; 6];

    for question in bank.questions() {
        let Some(selected) = answers.get(&question.id) else {
            continue;
        };
        match question.option(selected) {
            Some(option) => {
                for (&category, &weight) in &option.weights {
                    totals[category as usize] += weight;
                }
            }
            None => {
                debug!(
                    "answer for question {} references unknown option {selected}, ignoring",
                    question.id
                );
            }
        }
    }

    let mut scores = StreamScores::default();
    let max_possible = bank.max_possible_score();
    if max_possible == 0 {
        return scores;
    }

    for category in Category::ALL {
        let total = totals[category as usize];
        let percentage = (total as f64 / max_possible as f64 * 100.0).round() as u32;
        scores.set(category, percentage.min(100) as u8);
    }

    scores
}

/// Turns a score vector into the ranked recommendation list: the top three
/// streams that clear [`RECOMMEND_THRESHOLD`], strongest first, or the
/// single fallback sentence when none do.
pub fn recommend(scores: &StreamScores) -> Vec<String> {
    let mut ranked = scores.entries();
    // Stable sort: equal percentages keep declaration order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let recommendations: Vec<String> = ranked
        .iter()
        .take(TOP_STREAMS)
        .filter(|(_, percentage)| *percentage >= RECOMMEND_THRESHOLD)
        .map(|(category, _)| recommendation_for(*category).to_string())
        .collect();

    if recommendations.is_empty() {
        vec![FALLBACK_RECOMMENDATION.to_string()]
    } else {
        recommendations
    }
}

/// Canned guidance per stream, surfaced when that stream clears the
/// threshold.
pub fn recommendation_for(category: Category) -> &'static str {
    match category {
        Category::Science => "Consider pursuing B.Sc in Physics, Chemistry, or Mathematics",
        Category::Engineering => {
            "Engineering programs like Computer Science or Mechanical Engineering would suit you"
        }
        Category::Medical => "Medical field with MBBS or nursing programs aligns with your interests",
        Category::Commerce => "Business and commerce streams like B.Com or BBA are recommended",
        Category::Arts => "Liberal arts programs in Literature, History, or Social Sciences suit you",
        Category::Vocational => "Technical and vocational training programs would be beneficial",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::bank::{AnswerOption, Question};
    use crate::locale::LocalizedText;

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

    fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
        pairs
            .iter()
            .map(|(q, o)| (q.to_string(), o.to_string()))
            .collect()
    }

    /// Two questions, each with a single option worth 3 engineering points.
    fn engineering_bank() -> QuestionBank {
        QuestionBank::new(vec![
            question("1", vec![option("a", &[(Category::Engineering, 3)])]),
            question("2", vec![option("a", &[(Category::Engineering, 3)])]),
        ])
        .unwrap()
    }

    /// One question per stream whose single option maxes that stream.
    fn one_question_per_stream() -> QuestionBank {
        let questions = Category::ALL
            .iter()
            .enumerate()
            .map(|(index, &category)| {
                question(&format!("{}", index + 1), vec![option("a", &[(category, 3)])])
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    }

    #[test]
    fn empty_answers_score_zero_and_fall_back() {
        let bank = engineering_bank();
        let scores = score(&bank, &AnswerSet::new());

        assert_eq!(scores, StreamScores::default());
        assert_eq!(recommend(&scores), vec![FALLBACK_RECOMMENDATION.to_string()]);
    }

    #[test]
    fn scoring_is_deterministic() {
        let bank = engineering_bank();
        let selected = answers(&[("1", "a")]);

        assert_eq!(score(&bank, &selected), score(&bank, &selected));
    }

    #[test]
    fn percentages_stay_within_bounds() {
        let bank = one_question_per_stream();
        let selected = answers(&[
            ("1", "a"),
            ("2", "a"),
            ("3", "a"),
            ("4", "a"),
            ("5", "a"),
            ("6", "a"),
        ]);
        let scores = score(&bank, &selected);

        for (_, percentage) in scores.entries() {
            assert!(percentage <= 100);
        }
    }

    #[test]
    fn question_order_does_not_matter() {
        let forward = engineering_bank();
        let reversed = QuestionBank::new(vec![
            question("2", vec![option("a", &[(Category::Engineering, 3)])]),
            question("1", vec![option("a", &[(Category::Engineering, 3)])]),
        ])
        .unwrap();
        let selected = answers(&[("1", "a"), ("2", "a")]);

        assert_eq!(score(&forward, &selected), score(&reversed, &selected));
    }

    #[test]
    fn threshold_is_inclusive_at_seventy() {
        // 10 questions, 7 of which can push medical by 3: 21/30 = 70%.
        let mut questions = Vec::new();
        for index in 0..10 {
            let weights: &[(Category, u32)] = if index < 7 {
                &[(Category::Medical, 3)]
            } else {
                &[]
            };
            questions.push(question(&format!("{}", index + 1), vec![option("a", weights)]));
        }
        let bank = QuestionBank::new(questions).unwrap();
        let selected: AnswerSet = (1..=10).map(|i| (i.to_string(), "a".to_string())).collect();

        let scores = score(&bank, &selected);
        assert_eq!(scores.medical, 70);

        let recommendations = recommend(&scores);
        assert_eq!(
            recommendations,
            vec![recommendation_for(Category::Medical).to_string()]
        );
    }

    #[test]
    fn recommendations_cap_at_top_three() {
        let scores = StreamScores {
            science: 90,
            engineering: 85,
            medical: 80,
            commerce: 75,
            arts: 10,
            vocational: 0,
        };

        let recommendations = recommend(&scores);
        assert_eq!(
            recommendations,
            vec![
                recommendation_for(Category::Science).to_string(),
                recommendation_for(Category::Engineering).to_string(),
                recommendation_for(Category::Medical).to_string(),
            ]
        );
    }

    #[test]
    fn equal_scores_keep_declaration_order() {
        let scores = StreamScores {
            science: 80,
            engineering: 80,
            medical: 80,
            commerce: 80,
            arts: 80,
            vocational: 80,
        };

        let recommendations = recommend(&scores);
        assert_eq!(
            recommendations,
            vec![
                recommendation_for(Category::Science).to_string(),
                recommendation_for(Category::Engineering).to_string(),
                recommendation_for(Category::Medical).to_string(),
            ]
        );
    }

    #[test]
    fn fully_answered_engineering_bank_scores_hundred() {
        let bank = engineering_bank();
        let selected = answers(&[("1", "a"), ("2", "a")]);

        let scores = score(&bank, &selected);
        assert_eq!(scores.engineering, 100);
        assert_eq!(scores.science, 0);
        assert_eq!(scores.arts, 0);

        let recommendations = recommend(&scores);
        assert_eq!(
            recommendations,
            vec![recommendation_for(Category::Engineering).to_string()]
        );
    }

    #[test]
    fn partially_answered_engineering_bank_scores_fifty() {
        let bank = engineering_bank();
        let selected = answers(&[("1", "a")]);

        let scores = score(&bank, &selected);
        assert_eq!(scores.engineering, 50);

        assert_eq!(recommend(&scores), vec![FALLBACK_RECOMMENDATION.to_string()]);
    }

    #[test]
    fn unknown_option_counts_as_unanswered() {
        let bank = engineering_bank();
        let selected = answers(&[("1", "z"), ("2", "a")]);

        let scores = score(&bank, &selected);
        assert_eq!(scores.engineering, 50);
    }

    #[test]
    fn unknown_question_ids_are_ignored() {
        let bank = engineering_bank();
        let selected = answers(&[("1", "a"), ("99", "a")]);

        let scores = score(&bank, &selected);
        assert_eq!(scores.engineering, 50);
    }

    #[test]
    fn empty_bank_scores_zero_not_nan() {
        let bank = QuestionBank::new(vec![]).unwrap();
        let selected = answers(&[("1", "a")]);

        assert_eq!(score(&bank, &selected), StreamScores::default());
    }

    #[test]
    fn percentages_round_half_up() {
        // 1 of 3 questions answered for science: 3/9 = 33.3..% -> 33.
        // Commerce gets 2 on that answer: 2/9 = 22.2..% -> 22.
        let bank = QuestionBank::new(vec![
            question(
                "1",
                vec![option("a", &[(Category::Science, 3), (Category::Commerce, 2)])],
            ),
            question("2", vec![option("a", &[(Category::Science, 3)])]),
            question("3", vec![option("a", &[(Category::Science, 3)])]),
        ])
        .unwrap();

        let scores = score(&bank, &answers(&[("1", "a")]));
        assert_eq!(scores.science, 33);
        assert_eq!(scores.commerce, 22);
    }

    #[test]
    fn scores_serialize_with_stream_keys() {
        let scores = StreamScores {
            engineering: 100,
            ..StreamScores::default()
        };
        let json = serde_json::to_value(scores).unwrap();

        assert_eq!(json["engineering"], 100);
        assert_eq!(json["science"], 0);
        assert_eq!(json.as_object().unwrap().len(), 6);
    }
}
