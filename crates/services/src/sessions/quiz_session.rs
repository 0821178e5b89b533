use chrono::{DateTime, Utc};
use quiz_core::model::{ProgressError, Question, QuestionId, Quiz, QuizId, UserProgress};
use quiz_core::time::seconds_between;

//
// ─── ANSWERS ───────────────────────────────────────────────────────────────────
//

/// A locked-in answer for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    pub question_index: usize,
    pub selected: usize,
    pub is_correct: bool,
}

/// Returned by [`QuizSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub correct: usize,
    pub seconds: u64,
}

/// Final state of a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub quiz_id: QuizId,
    pub score: u32,
    pub total: usize,
    pub answers: Vec<SubmittedAnswer>,
    pub elapsed_seconds: u64,
    pub completed_at: DateTime<Utc>,
}

impl QuizOutcome {
    /// Correct answers over the total question count, rounded to a percent.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let total = u32::try_from(self.total).unwrap_or(u32::MAX);
        (self.score * 100 + total / 2) / total
    }

    #[must_use]
    pub fn wrong_count(&self) -> usize {
        self.answers.iter().filter(|answer| !answer.is_correct).count()
    }

    #[must_use]
    pub fn wrong_answers(&self) -> Vec<&SubmittedAnswer> {
        self.answers.iter().filter(|answer| !answer.is_correct).collect()
    }

    /// Progress record for the attempt.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the outcome does not fit `quiz`.
    pub fn to_progress(&self, quiz: &Quiz) -> Result<UserProgress, ProgressError> {
        UserProgress::completed(quiz, self.score, self.completed_at)
    }
}

/// Result of [`QuizSession::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at this index.
    Next(usize),
    Finished(QuizOutcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One in-progress attempt: select, submit, advance per question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    quiz: Quiz,
    current: usize,
    selected: Option<usize>,
    explanation_shown: bool,
    answers: Vec<SubmittedAnswer>,
    score: u32,
    started_at: DateTime<Utc>,
    question_started_at: DateTime<Utc>,
}

impl QuizSession {
    #[must_use]
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Self {
        Self {
            quiz,
            current: 0,
            selected: None,
            explanation_shown: false,
            answers: Vec::new(),
            score: 0,
            started_at,
            question_started_at: started_at,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.question(self.current)
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn explanation_shown(&self) -> bool {
        self.explanation_shown
    }

    #[must_use]
    pub fn answers(&self) -> &[SubmittedAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.quiz.question_count()
    }

    /// One-based position and total, e.g. `(2, 5)`.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.current + 1, self.quiz.question_count())
    }

    /// Score over the questions answered so far.
    #[must_use]
    pub fn running_score(&self) -> (u32, usize) {
        (self.score, self.answers.len())
    }

    /// The answer submitted for the current question, once the explanation shows.
    #[must_use]
    pub fn current_answer(&self) -> Option<&SubmittedAnswer> {
        if !self.explanation_shown {
            return None;
        }
        self.answers
            .iter()
            .find(|answer| answer.question_index == self.current)
    }

    /// Choose an option for the current question.
    ///
    /// Returns `false` when options are locked or `option` is out of range.
    pub fn select(&mut self, option: usize) -> bool {
        if self.explanation_shown {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        if option >= question.options().len() {
            return false;
        }
        self.selected = Some(option);
        true
    }

    /// Lock in the pending choice and reveal the explanation.
    ///
    /// Returns `None`, leaving the session untouched, when nothing is
    /// selected or the current question was already submitted.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Option<AnswerFeedback> {
        if self.explanation_shown {
            return None;
        }
        let selected = self.selected?;
        let question = self.quiz.question(self.current)?;
        let is_correct = question.is_correct(selected);
        let feedback = AnswerFeedback {
            question_id: question.id(),
            is_correct,
            correct: question.correct(),
            seconds: seconds_between(self.question_started_at, now),
        };

        self.answers.push(SubmittedAnswer {
            question_id: question.id(),
            question_index: self.current,
            selected,
            is_correct,
        });
        if is_correct {
            self.score += 1;
        }
        self.explanation_shown = true;
        Some(feedback)
    }

    /// Move past a submitted question.
    ///
    /// Returns `None` before the current question is submitted.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Option<Advance> {
        if !self.explanation_shown {
            return None;
        }
        if self.is_last_question() {
            return Some(Advance::Finished(QuizOutcome {
                quiz_id: self.quiz.id(),
                score: self.score,
                total: self.quiz.question_count(),
                answers: self.answers.clone(),
                elapsed_seconds: seconds_between(self.started_at, now),
                completed_at: now,
            }));
        }
        self.current += 1;
        self.selected = None;
        self.explanation_shown = false;
        self.question_started_at = now;
        Some(Advance::Next(self.current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{Difficulty, QuestionKind};
    use quiz_core::time::fixed_now;

    fn quiz(correct: &[usize]) -> Quiz {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, key)| {
                Question::new(
                    QuestionId::new(i as u64 + 1),
                    QuestionKind::MultipleChoice,
                    format!("Q{i}"),
                    vec!["a".into(), "b".into(), "c".into()],
                    *key,
                    format!("because {i}"),
                )
                .unwrap()
            })
            .collect();
        Quiz::new(
            QuizId::new(7),
            "Sample",
            "",
            Difficulty::Intermediate,
            None,
            None,
            questions,
        )
        .unwrap()
    }

    fn answer_all(session: &mut QuizSession, picks: &[usize]) -> QuizOutcome {
        let mut now = fixed_now();
        for pick in picks {
            assert!(session.select(*pick));
            now += Duration::seconds(10);
            session.submit(now).unwrap();
            if let Advance::Finished(outcome) = session.advance(now).unwrap() {
                return outcome;
            }
        }
        panic!("quiz did not finish");
    }

    #[test]
    fn scores_incrementally_and_fills_completed_indices() {
        let quiz = quiz(&[1, 0, 2]);
        let mut session = QuizSession::new(quiz.clone(), fixed_now());
        let outcome = answer_all(&mut session, &[1, 0, 1]);

        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.wrong_count(), 1);
        assert_eq!(outcome.elapsed_seconds, 30);
        assert_eq!(outcome.accuracy_percent(), 67);

        let progress = outcome.to_progress(&quiz).unwrap();
        assert_eq!(progress.score(), 2);
        assert_eq!(progress.completed_questions(), &[0, 1, 2]);
    }

    #[test]
    fn submit_without_selection_is_a_no_op() {
        let mut session = QuizSession::new(quiz(&[0]), fixed_now());
        let before = session.clone();
        assert!(session.submit(fixed_now()).is_none());
        assert_eq!(session, before);
        assert!(!session.explanation_shown());
    }

    #[test]
    fn selection_is_replaced_then_locked() {
        let mut session = QuizSession::new(quiz(&[2, 0]), fixed_now());
        assert!(session.select(0));
        assert!(session.select(2));
        assert_eq!(session.selected(), Some(2));

        let feedback = session.submit(fixed_now() + Duration::seconds(4)).unwrap();
        assert!(feedback.is_correct);
        assert_eq!(feedback.seconds, 4);

        assert!(!session.select(1));
        assert_eq!(session.selected(), Some(2));
        assert!(session.submit(fixed_now()).is_none());
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut session = QuizSession::new(quiz(&[0]), fixed_now());
        assert!(!session.select(3));
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn advance_requires_submission_and_resets_question_state() {
        let mut session = QuizSession::new(quiz(&[0, 1]), fixed_now());
        assert!(session.advance(fixed_now()).is_none());

        session.select(1);
        session.submit(fixed_now());
        assert_eq!(session.running_score(), (0, 1));
        assert_eq!(
            session.advance(fixed_now() + Duration::seconds(5)),
            Some(Advance::Next(1))
        );
        assert_eq!(session.position(), (2, 2));
        assert_eq!(session.selected(), None);
        assert!(!session.explanation_shown());

        session.select(1);
        let feedback = session.submit(fixed_now() + Duration::seconds(8)).unwrap();
        assert_eq!(feedback.seconds, 3);
    }
}
