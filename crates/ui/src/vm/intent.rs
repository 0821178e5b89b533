use quiz_core::model::QuizId;
use services::{FlowError, QuizFlow};

/// Everything a view can ask the flow to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Login(String),
    SelectQuiz(QuizId),
    OpenArticle,
    StartQuiz,
    SelectOption(usize),
    Submit,
    Next,
    Abandon,
    BackToList,
    Retry,
    MoreQuizzes,
    ReviewMistakes,
    Logout,
}

/// Side effects the shell must perform outside the flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentEffect {
    None,
    OpenUrl(String),
}

/// Lets one intent run at a time; the rest are dropped while it is busy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntentGate {
    busy: bool,
}

impl IntentGate {
    /// `false` when another intent is still running.
    pub fn try_begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn finish(&mut self) {
        self.busy = false;
    }

    #[must_use]
    pub fn is_busy(self) -> bool {
        self.busy
    }
}

/// Apply one intent to the flow.
///
/// # Errors
///
/// Returns the `FlowError` raised by the underlying transition.
pub async fn apply_intent(
    flow: &mut QuizFlow,
    intent: QuizIntent,
) -> Result<IntentEffect, FlowError> {
    match intent {
        QuizIntent::Login(raw) => flow.login(&raw).await?,
        QuizIntent::SelectQuiz(id) => flow.select_quiz(id)?,
        QuizIntent::OpenArticle => return flow.open_article().map(IntentEffect::OpenUrl),
        QuizIntent::StartQuiz => flow.start_quiz()?,
        QuizIntent::SelectOption(index) => {
            flow.select_option(index)?;
        }
        QuizIntent::Submit => {
            flow.submit_answer()?;
        }
        QuizIntent::Next => flow.next_question().await?,
        QuizIntent::Abandon => flow.abandon_quiz()?,
        QuizIntent::BackToList => flow.back_to_list()?,
        QuizIntent::Retry => flow.retry()?,
        QuizIntent::MoreQuizzes => flow.more_quizzes()?,
        QuizIntent::ReviewMistakes => {
            flow.review_mistakes()?;
        }
        QuizIntent::Logout => flow.logout().await?,
    }
    Ok(IntentEffect::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::Catalog;
    use quiz_core::time::fixed_now;
    use services::{AppServices, Clock, EventBus, Screen};

    fn flow() -> QuizFlow {
        AppServices::in_memory(
            Clock::fixed(fixed_now()),
            Catalog::bundled().unwrap(),
            EventBus::new(),
        )
        .flow()
    }

    #[test]
    fn gate_admits_one_intent_until_finished() {
        let mut gate = IntentGate::default();
        assert!(gate.try_begin());
        assert!(gate.is_busy());
        assert!(!gate.try_begin());
        gate.finish();
        assert!(!gate.is_busy());
        assert!(gate.try_begin());
    }

    #[tokio::test]
    async fn article_intents_return_the_url_to_open() {
        let mut flow = flow();
        apply_intent(&mut flow, QuizIntent::Login("dev".into()))
            .await
            .unwrap();
        apply_intent(&mut flow, QuizIntent::SelectQuiz(QuizId::new(1)))
            .await
            .unwrap();
        assert_eq!(flow.screen(), Screen::Article);

        let effect = apply_intent(&mut flow, QuizIntent::OpenArticle).await.unwrap();
        let IntentEffect::OpenUrl(url) = effect else {
            panic!("expected OpenUrl, got {effect:?}");
        };
        assert!(url.starts_with("https://"));

        apply_intent(&mut flow, QuizIntent::StartQuiz).await.unwrap();
        assert_eq!(flow.screen(), Screen::Quiz);
    }

    #[tokio::test]
    async fn invalid_intents_surface_flow_errors() {
        let mut flow = flow();
        let err = apply_intent(&mut flow, QuizIntent::Retry).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidTransition { .. }));

        let err = apply_intent(&mut flow, QuizIntent::Login("   ".into()))
            .await
            .unwrap_err();
        assert_eq!(err, FlowError::EmptyUserId);
        assert_eq!(flow.screen(), Screen::Login);
    }
}
