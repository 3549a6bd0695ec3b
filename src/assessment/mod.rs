pub mod bank;
pub mod category;
pub mod scoring;

pub use bank::{AnswerOption, BankError, Question, QuestionBank, MAX_OPTION_WEIGHT};
pub use category::Category;
pub use scoring::{
    recommend, recommendation_for, score, AnswerSet, StreamScores, FALLBACK_RECOMMENDATION,
    RECOMMEND_THRESHOLD, TOP_STREAMS,
};
