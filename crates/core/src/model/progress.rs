use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::quiz::Quiz;
use crate::model::user::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("score {score} exceeds the {total} questions of quiz {quiz}")]
    ScoreExceedsQuestions { quiz: QuizId, score: u32, total: usize },
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Outcome of the latest attempt at one quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    quiz_id: QuizId,
    completed_questions: Vec<usize>,
    score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl UserProgress {
    /// Record a finished attempt: every question index is marked completed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ScoreExceedsQuestions` if `score` is larger
    /// than the quiz's question count.
    pub fn completed(
        quiz: &Quiz,
        score: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        let total = quiz.question_count();
        if usize::try_from(score).map_or(true, |score| score > total) {
            return Err(ProgressError::ScoreExceedsQuestions {
                quiz: quiz.id(),
                score,
                total,
            });
        }
        Ok(Self {
            quiz_id: quiz.id(),
            completed_questions: (0..total).collect(),
            score,
            completed_at: Some(completed_at),
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn completed_questions(&self) -> &[usize] {
        &self.completed_questions
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// True when this record is consistent with the given quiz definition.
    #[must_use]
    pub fn fits(&self, quiz: &Quiz) -> bool {
        self.quiz_id == quiz.id()
            && usize::try_from(self.score).is_ok_and(|score| score <= quiz.question_count())
            && self
                .completed_questions
                .iter()
                .all(|index| *index < quiz.question_count())
    }
}

/// Insert or replace the record for `progress.quiz_id()`.
pub fn upsert_progress(list: &mut Vec<UserProgress>, progress: UserProgress) {
    match list.iter_mut().find(|p| p.quiz_id == progress.quiz_id) {
        Some(slot) => *slot = progress,
        None => list.push(progress),
    }
}

//
// ─── USER DATA ─────────────────────────────────────────────────────────────────
//

/// Per-user profile: assignments plus the latest attempt per quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    user_id: UserId,
    available_quizzes: Vec<QuizId>,
    #[serde(default)]
    progress: Vec<UserProgress>,
    created_at: DateTime<Utc>,
    last_login_at: DateTime<Utc>,
}

impl UserData {
    #[must_use]
    pub fn new(user_id: UserId, available_quizzes: Vec<QuizId>, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            available_quizzes,
            progress: Vec::new(),
            created_at: now,
            last_login_at: now,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn available_quizzes(&self) -> &[QuizId] {
        &self.available_quizzes
    }

    #[must_use]
    pub fn is_available(&self, quiz_id: QuizId) -> bool {
        self.available_quizzes.contains(&quiz_id)
    }

    #[must_use]
    pub fn progress(&self) -> &[UserProgress] {
        &self.progress
    }

    #[must_use]
    pub fn progress_for(&self, quiz_id: QuizId) -> Option<&UserProgress> {
        self.progress.iter().find(|p| p.quiz_id == quiz_id)
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn last_login_at(&self) -> DateTime<Utc> {
        self.last_login_at
    }

    pub fn set_available_quizzes(&mut self, ids: Vec<QuizId>) {
        self.available_quizzes = ids;
    }

    pub fn set_last_login_at(&mut self, at: DateTime<Utc>) {
        self.last_login_at = at;
    }

    /// Drop progress records rejected by `keep`.
    pub fn retain_progress(&mut self, keep: impl FnMut(&UserProgress) -> bool) {
        self.progress.retain(keep);
    }

    /// Replace any earlier attempt at the same quiz.
    pub fn record_progress(&mut self, progress: UserProgress) {
        upsert_progress(&mut self.progress, progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Question, QuestionId, QuestionKind};
    use crate::time::fixed_now;

    fn quiz(questions: u64) -> Quiz {
        let questions = (1..=questions)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    QuestionKind::MultipleChoice,
                    format!("Q{id}"),
                    vec!["a".into(), "b".into(), "c".into()],
                    1,
                    "",
                )
                .unwrap()
            })
            .collect();
        Quiz::new(
            QuizId::new(9),
            "Quiz",
            "",
            Difficulty::Beginner,
            None,
            None,
            questions,
        )
        .unwrap()
    }

    #[test]
    fn completed_marks_every_index() {
        let quiz = quiz(3);
        let progress = UserProgress::completed(&quiz, 2, fixed_now()).unwrap();
        assert_eq!(progress.completed_questions(), &[0, 1, 2]);
        assert_eq!(progress.score(), 2);
        assert!(progress.fits(&quiz));
    }

    #[test]
    fn score_above_question_count_is_rejected() {
        let quiz = quiz(2);
        let err = UserProgress::completed(&quiz, 3, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            ProgressError::ScoreExceedsQuestions {
                quiz: QuizId::new(9),
                score: 3,
                total: 2
            }
        );
    }

    #[test]
    fn record_progress_overwrites_same_quiz() {
        let quiz = quiz(2);
        let mut data = UserData::new(UserId::new("dana").unwrap(), vec![quiz.id()], fixed_now());
        data.record_progress(UserProgress::completed(&quiz, 1, fixed_now()).unwrap());
        data.record_progress(UserProgress::completed(&quiz, 2, fixed_now()).unwrap());
        assert_eq!(data.progress().len(), 1);
        assert_eq!(data.progress_for(quiz.id()).map(UserProgress::score), Some(2));
    }

    #[test]
    fn user_data_uses_camel_case_fields() {
        let data = UserData::new(
            UserId::new("erin").unwrap(),
            vec![QuizId::new(1), QuizId::new(2)],
            fixed_now(),
        );
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["userId"], "erin");
        assert_eq!(json["availableQuizzes"], serde_json::json!([1, 2]));
        assert!(json.get("lastLoginAt").is_some());
        let back: UserData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }
}
