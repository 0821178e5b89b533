use quiz_core::model::{QuestionKind, QuizId};
use services::{QuizFlow, QuizSession};

use super::quiz_list_vm::difficulty_class;

//
// ─── ARTICLE ───────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleVm {
    pub quiz_id: QuizId,
    pub title: String,
    pub description: String,
    pub difficulty_label: &'static str,
    pub difficulty_class: &'static str,
    pub question_count: usize,
    pub url: String,
}

#[must_use]
pub fn map_article(flow: &QuizFlow) -> Option<ArticleVm> {
    let quiz = flow.selected_quiz()?;
    Some(ArticleVm {
        quiz_id: quiz.id(),
        title: quiz.title().to_string(),
        description: quiz.description().to_string(),
        difficulty_label: quiz.difficulty().label(),
        difficulty_class: difficulty_class(quiz.difficulty()),
        question_count: quiz.question_count(),
        url: quiz.article_url()?.to_string(),
    })
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    Selected,
    Correct,
    Wrong,
    Dimmed,
}

impl OptionState {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            OptionState::Idle => "option",
            OptionState::Selected => "option option-selected",
            OptionState::Correct => "option option-correct",
            OptionState::Wrong => "option option-wrong",
            OptionState::Dimmed => "option option-dimmed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub state: OptionState,
    pub locked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplanationVm {
    pub is_correct: bool,
    pub correct_label: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub title: String,
    pub position_label: String,
    pub progress_percent: usize,
    pub kind_label: &'static str,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub can_submit: bool,
    pub explanation: Option<ExplanationVm>,
    /// Score over answered questions, `None` before the first answer.
    pub running_score: Option<String>,
    pub next_label: &'static str,
}

fn option_state(session: &QuizSession, index: usize, correct: usize) -> OptionState {
    if !session.explanation_shown() {
        return if session.selected() == Some(index) {
            OptionState::Selected
        } else {
            OptionState::Idle
        };
    }
    if index == correct {
        OptionState::Correct
    } else if session.selected() == Some(index) {
        OptionState::Wrong
    } else {
        OptionState::Dimmed
    }
}

/// `None` when the selected quiz could not be found.
#[must_use]
pub fn map_quiz(flow: &QuizFlow) -> Option<QuizVm> {
    let session = flow.session()?;
    let question = session.current_question()?;
    let (position, total) = session.position();
    let shown = session.explanation_shown();

    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(index, label)| OptionVm {
            index,
            label: label.clone(),
            state: option_state(session, index, question.correct()),
            locked: shown,
        })
        .collect();

    let explanation = session.current_answer().map(|answer| ExplanationVm {
        is_correct: answer.is_correct,
        correct_label: question
            .options()
            .get(question.correct())
            .cloned()
            .unwrap_or_default(),
        text: question.explanation().to_string(),
    });

    let (score, answered) = session.running_score();
    Some(QuizVm {
        title: session.quiz().title().to_string(),
        position_label: format!("{position} / {total}"),
        progress_percent: position * 100 / total.max(1),
        kind_label: match question.kind() {
            QuestionKind::MultipleChoice => "Multiple choice",
            QuestionKind::TrueFalse => "True / False",
        },
        prompt: question.prompt().to_string(),
        options,
        can_submit: !shown && session.selected().is_some(),
        explanation,
        running_score: (answered > 0).then(|| format!("Score: {score} / {answered}")),
        next_label: if session.is_last_question() {
            "See results"
        } else {
            "Next question"
        },
    })
}
