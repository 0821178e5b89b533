use services::QuizFlow;

use super::time_fmt::format_duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerformanceTier {
    Excellent,
    Great,
    Good,
    Fair,
    Retry,
}

impl PerformanceTier {
    #[must_use]
    pub const fn from_accuracy(accuracy: u32) -> Self {
        match accuracy {
            90.. => Self::Excellent,
            80..=89 => Self::Great,
            70..=79 => Self::Good,
            60..=69 => Self::Fair,
            _ => Self::Retry,
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Perfect understanding!",
            Self::Great => "Great result!",
            Self::Good => "A good start!",
            Self::Fair => "Keep studying!",
            Self::Retry => "Give it another try!",
        }
    }

    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Excellent => "tier tier-excellent",
            Self::Great => "tier tier-great",
            Self::Good => "tier tier-good",
            Self::Fair => "tier tier-fair",
            Self::Retry => "tier tier-retry",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRowVm {
    pub number: usize,
    pub prompt: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    /// Shown for wrong answers only.
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub title: String,
    pub score: u32,
    pub total: usize,
    pub accuracy: u32,
    pub time_label: String,
    pub wrong_count: usize,
    pub tier: PerformanceTier,
    pub rows: Vec<ResultRowVm>,
    pub mistakes_only: bool,
    pub has_article: bool,
}

#[must_use]
pub fn map_result(flow: &QuizFlow) -> Option<ResultVm> {
    let outcome = flow.outcome()?;
    let quiz = flow.selected_quiz()?;
    let mistakes_only = flow.showing_mistakes_only();

    let rows = outcome
        .answers
        .iter()
        .filter(|answer| !mistakes_only || !answer.is_correct)
        .filter_map(|answer| {
            let question = quiz.question(answer.question_index)?;
            let label = |index: usize| question.options().get(index).cloned().unwrap_or_default();
            Some(ResultRowVm {
                number: answer.question_index + 1,
                prompt: question.prompt().to_string(),
                your_answer: label(answer.selected),
                correct_answer: label(question.correct()),
                is_correct: answer.is_correct,
                explanation: (!answer.is_correct).then(|| question.explanation().to_string()),
            })
        })
        .collect();

    let accuracy = outcome.accuracy_percent();
    Some(ResultVm {
        title: quiz.title().to_string(),
        score: outcome.score,
        total: outcome.total,
        accuracy,
        time_label: format_duration(outcome.elapsed_seconds),
        wrong_count: outcome.wrong_count(),
        tier: PerformanceTier::from_accuracy(accuracy),
        rows,
        mistakes_only,
        has_article: quiz.has_article(),
    })
}
