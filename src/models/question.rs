//! Trivia question model.

use serde::{Deserialize, Serialize};

/// A trivia question belonging to exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// Validated input for inserting a question.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// Body of `POST /questions`.
///
/// The frontend posts both searches and new questions to the same route, so
/// every field is optional and the handler decides which one it got.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionsPostRequest {
    #[serde(default, rename = "searchTerm")]
    pub search_term: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<i64>,
}

/// Category selector sent by the quiz frontend.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizCategory {
    /// `0` means every category.
    pub id: i64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Body of `POST /quizzes`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Option<Vec<i64>>,
    pub quiz_category: Option<QuizCategory>,
}
