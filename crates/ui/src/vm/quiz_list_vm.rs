use quiz_core::model::{Difficulty, Quiz, QuizId, UserData};
use services::QuizFlow;

use super::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizCardVm {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub difficulty_label: &'static str,
    pub difficulty_class: &'static str,
    pub question_count: usize,
    pub has_article: bool,
    /// `"score/total"` of the latest finished attempt.
    pub completed_score: Option<String>,
    pub completed_on: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizListVm {
    pub user_label: String,
    pub is_special_user: bool,
    pub assignment_ratio: Option<String>,
    pub is_directly_assigned: bool,
    pub cards: Vec<QuizCardVm>,
}

#[must_use]
pub fn difficulty_class(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "badge badge-beginner",
        Difficulty::Intermediate => "badge badge-intermediate",
        Difficulty::Advanced => "badge badge-advanced",
    }
}

fn map_card(quiz: &Quiz, user: Option<&UserData>) -> QuizCardVm {
    let progress = user.and_then(|data| data.progress_for(quiz.id()));
    QuizCardVm {
        id: quiz.id(),
        title: quiz.title().to_string(),
        description: quiz.description().to_string(),
        difficulty_label: quiz.difficulty().label(),
        difficulty_class: difficulty_class(quiz.difficulty()),
        question_count: quiz.question_count(),
        has_article: quiz.has_article(),
        completed_score: progress.map(|p| format!("{}/{}", p.score(), quiz.question_count())),
        completed_on: progress.and_then(|p| p.completed_at()).map(format_date),
    }
}

#[must_use]
pub fn map_quiz_list(flow: &QuizFlow) -> QuizListVm {
    let user = flow.user();
    let info = flow.assignment_info();
    QuizListVm {
        user_label: user.map(|data| data.user_id().to_string()).unwrap_or_default(),
        is_special_user: flow.is_special_user(),
        assignment_ratio: info.as_ref().map(services::AssignmentInfo::ratio),
        is_directly_assigned: info.is_some_and(|info| info.is_directly_assigned),
        cards: flow
            .available_quizzes()
            .into_iter()
            .map(|quiz| map_card(quiz, user))
            .collect(),
    }
}
