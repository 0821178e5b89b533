//! The static quiz catalog, loaded once at startup.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::model::{Quiz, QuizError, QuizId};

const DEFAULT_CATALOG_JSON: &str = include_str!("../data/quizzes.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog is not valid quiz JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog repeats quiz id {0}")]
    DuplicateQuiz(QuizId),

    #[error(transparent)]
    InvalidQuiz(#[from] QuizError),
}

/// Ordered, validated set of every quiz the app knows about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    quizzes: Vec<Quiz>,
}

impl Catalog {
    /// Build a catalog, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if a quiz id repeats or a quiz is invalid.
    pub fn new(quizzes: Vec<Quiz>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(quizzes.len());
        for quiz in &quizzes {
            if !seen.insert(quiz.id()) {
                return Err(CatalogError::DuplicateQuiz(quiz.id()));
            }
            quiz.validate()?;
        }
        Ok(Self { quizzes })
    }

    /// Parse a JSON array of quizzes.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and the
    /// [`Catalog::new`] errors for inconsistent content.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let quizzes: Vec<Quiz> = serde_json::from_str(json)?;
        Self::new(quizzes)
    }

    /// The catalog bundled with the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled data is inconsistent.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG_JSON)
    }

    #[must_use]
    pub fn get(&self, id: QuizId) -> Option<&Quiz> {
        self.quizzes.iter().find(|quiz| quiz.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quiz> {
        self.quizzes.iter()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<QuizId> {
        self.quizzes.iter().map(Quiz::id).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    /// Every distinct owner tag, sorted.
    #[must_use]
    pub fn owner_tags(&self) -> Vec<String> {
        self.quizzes
            .iter()
            .filter_map(|quiz| quiz.access_policy().tag().map(str::to_string))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_QUIZZES: &str = r#"[
        {
            "id": 1,
            "title": "Ownership",
            "description": "Moves and borrows",
            "difficulty": "beginner",
            "articleUrl": "https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html",
            "userId": "alice",
            "questions": [
                { "id": 1, "type": "true_false", "question": "Q1", "options": ["True", "False"], "correct": 0, "explanation": "E1" },
                { "id": 2, "type": "multiple_choice", "question": "Q2", "options": ["a", "b", "c"], "correct": 2, "explanation": "E2" }
            ]
        },
        {
            "id": 2,
            "title": "Traits",
            "description": "Shared behaviour",
            "difficulty": "advanced",
            "userId": "Bob",
            "questions": [
                { "id": 1, "type": "multiple_choice", "question": "Q", "options": ["x", "y"], "correct": 1, "explanation": "E" }
            ]
        }
    ]"#;

    #[test]
    fn parses_catalog_in_order() {
        let catalog = Catalog::from_json(TWO_QUIZZES).unwrap();
        assert_eq!(catalog.ids(), vec![QuizId::new(1), QuizId::new(2)]);
        assert_eq!(catalog.get(QuizId::new(2)).map(Quiz::title), Some("Traits"));
        assert!(catalog.get(QuizId::new(3)).is_none());
    }

    #[test]
    fn owner_tags_are_lowercase_and_unique() {
        let catalog = Catalog::from_json(TWO_QUIZZES).unwrap();
        assert_eq!(catalog.owner_tags(), vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn duplicate_quiz_ids_are_rejected() {
        let catalog = Catalog::from_json(TWO_QUIZZES).unwrap();
        let mut quizzes: Vec<Quiz> = catalog.iter().cloned().collect();
        quizzes.push(quizzes[0].clone());
        let err = Catalog::new(quizzes).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateQuiz(id) if id == QuizId::new(1)));
    }

    #[test]
    fn out_of_range_answer_key_fails_validation() {
        let json = r#"[{
            "id": 5, "title": "Broken", "description": "", "difficulty": "beginner",
            "questions": [{ "id": 1, "type": "multiple_choice", "question": "Q", "options": ["a"], "correct": 1, "explanation": "" }]
        }]"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidQuiz(QuizError::Question { .. })));
    }

    #[test]
    fn bundled_catalog_answer_keys_are_in_range() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.is_empty());
        for quiz in catalog.iter() {
            assert!(quiz.question_count() > 0);
            for question in quiz.questions() {
                assert!(question.correct() < question.options().len());
            }
        }
    }
}
