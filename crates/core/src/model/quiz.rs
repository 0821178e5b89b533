use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{QuestionId, QuizId};
use crate::model::question::{Question, QuestionError};
use crate::model::user::UserId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz {id} title cannot be empty")]
    EmptyTitle { id: QuizId },

    #[error("quiz {id} has no questions")]
    NoQuestions { id: QuizId },

    #[error("quiz {quiz} repeats question id {question}")]
    DuplicateQuestion { quiz: QuizId, question: QuestionId },

    #[error("quiz {quiz}: {source}")]
    Question {
        quiz: QuizId,
        #[source]
        source: QuestionError,
    },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

//
// ─── ACCESS POLICY ─────────────────────────────────────────────────────────────
//

/// Who may see a quiz.
///
/// Tags are stored lowercase so that matching is case-insensitive on both
/// sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessPolicy {
    Open,
    RestrictedTo(String),
}

impl AccessPolicy {
    /// Policy for an optional owner tag. Blank tags are treated as open.
    #[must_use]
    pub fn from_owner_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some(tag) if !tag.is_empty() => Self::RestrictedTo(tag.to_lowercase()),
            _ => Self::Open,
        }
    }

    /// True when the quiz is tagged for exactly this user.
    #[must_use]
    pub fn is_assigned_to(&self, user: &UserId) -> bool {
        match self {
            Self::Open => false,
            Self::RestrictedTo(tag) => *tag == user.match_key(),
        }
    }

    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Open => None,
            Self::RestrictedTo(tag) => Some(tag),
        }
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An immutable quiz definition from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: String,
    difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    article_url: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    owner_tag: Option<String>,
    questions: Vec<Question>,
}

impl Quiz {
    /// Build a validated quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the title is blank, there are no questions,
    /// question ids repeat, or any question is invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        article_url: Option<String>,
        owner_tag: Option<String>,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let quiz = Self {
            id,
            title: title.into(),
            description: description.into(),
            difficulty,
            article_url,
            owner_tag,
            questions,
        };
        quiz.validate()?;
        Ok(quiz)
    }

    /// Re-check invariants, used after deserializing catalog data.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Quiz::new`].
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.title.trim().is_empty() {
            return Err(QuizError::EmptyTitle { id: self.id });
        }
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions { id: self.id });
        }
        let mut seen = HashSet::with_capacity(self.questions.len());
        for question in &self.questions {
            if !seen.insert(question.id()) {
                return Err(QuizError::DuplicateQuestion {
                    quiz: self.id,
                    question: question.id(),
                });
            }
            question.validate().map_err(|source| QuizError::Question {
                quiz: self.id,
                source,
            })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The source article, if the quiz has a non-empty one.
    #[must_use]
    pub fn article_url(&self) -> Option<&str> {
        self.article_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    #[must_use]
    pub fn has_article(&self) -> bool {
        self.article_url().is_some()
    }

    #[must_use]
    pub fn owner_tag(&self) -> Option<&str> {
        self.owner_tag.as_deref()
    }

    #[must_use]
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::from_owner_tag(self.owner_tag.as_deref())
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::QuestionKind;

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            QuestionKind::TrueFalse,
            format!("Q{id}"),
            vec!["True".into(), "False".into()],
            0,
            "because",
        )
        .unwrap()
    }

    #[test]
    fn policy_matches_tags_case_insensitively() {
        let policy = AccessPolicy::from_owner_tag(Some("Alice"));
        assert!(policy.is_assigned_to(&UserId::new("ALICE").unwrap()));
        assert!(policy.is_assigned_to(&UserId::new("alice").unwrap()));
        assert!(!policy.is_assigned_to(&UserId::new("bob").unwrap()));
    }

    #[test]
    fn blank_owner_tag_is_open_and_assigns_no_one() {
        let policy = AccessPolicy::from_owner_tag(Some("  "));
        assert_eq!(policy, AccessPolicy::Open);
        let carol = UserId::new("carol").unwrap();
        assert!(!policy.is_assigned_to(&carol));
    }

    #[test]
    fn quiz_rejects_duplicate_question_ids() {
        let err = Quiz::new(
            QuizId::new(1),
            "Dup",
            "",
            Difficulty::Beginner,
            None,
            None,
            vec![question(1), question(1)],
        )
        .unwrap_err();
        assert!(matches!(err, QuizError::DuplicateQuestion { .. }));
    }

    #[test]
    fn quiz_requires_questions() {
        let err = Quiz::new(
            QuizId::new(2),
            "Empty",
            "",
            Difficulty::Advanced,
            None,
            None,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::NoQuestions { id: QuizId::new(2) });
    }

    #[test]
    fn blank_article_url_counts_as_absent() {
        let quiz = Quiz::new(
            QuizId::new(3),
            "No article",
            "",
            Difficulty::Intermediate,
            Some("   ".into()),
            None,
            vec![question(1)],
        )
        .unwrap();
        assert!(!quiz.has_article());
        assert_eq!(quiz.article_url(), None);
    }
}
