use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use quiz_core::Clock;
use quiz_core::model::{Quiz, QuizId, UserData, UserId};
use quiz_core::time::seconds_between;
use storage::LocalStore;

use super::quiz_session::{Advance, AnswerFeedback, QuizOutcome, QuizSession};
use crate::error::FlowError;
use crate::events::{Cta, EventBus, QuizEvent};
use crate::resolver::{AssignmentInfo, Resolver};

/// Top-level screens, in the order a user normally visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    List,
    Article,
    Quiz,
    Result,
}

impl Screen {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::List => "list",
            Screen::Article => "article",
            Screen::Quiz => "quiz",
            Screen::Result => "result",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives screen transitions and persists finished attempts.
///
/// Every operation either succeeds or returns a [`FlowError`] with the flow
/// left exactly as it was.
#[derive(Clone)]
pub struct QuizFlow {
    resolver: Resolver,
    store: LocalStore,
    events: EventBus,
    clock: Clock,
    screen: Screen,
    user: Option<UserData>,
    selected: Option<QuizId>,
    session: Option<QuizSession>,
    outcome: Option<QuizOutcome>,
    mistakes_only: bool,
    article_entered_at: Option<DateTime<Utc>>,
    attempts: HashMap<QuizId, u32>,
}

impl QuizFlow {
    #[must_use]
    pub fn new(resolver: Resolver, store: LocalStore, events: EventBus, clock: Clock) -> Self {
        Self {
            resolver,
            store,
            events,
            clock,
            screen: Screen::Login,
            user: None,
            selected: None,
            session: None,
            outcome: None,
            mistakes_only: false,
            article_entered_at: None,
            attempts: HashMap::new(),
        }
    }

    // ─── queries ───────────────────────────────────────────────────────────────

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserData> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    #[must_use]
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Quizzes on the list screen, in catalog order.
    #[must_use]
    pub fn available_quizzes(&self) -> Vec<&Quiz> {
        self.user
            .as_ref()
            .map(|data| self.resolver.available_quizzes(data))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn assignment_info(&self) -> Option<AssignmentInfo> {
        let data = self.user.as_ref()?;
        Some(self.resolver.assignment_info(data.user_id()))
    }

    #[must_use]
    pub fn is_special_user(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|data| Resolver::is_special_user(data.user_id()))
    }

    #[must_use]
    pub fn selected_quiz_id(&self) -> Option<QuizId> {
        self.selected
    }

    /// The selected quiz, if it is one the user may take.
    #[must_use]
    pub fn selected_quiz(&self) -> Option<&Quiz> {
        let id = self.selected?;
        self.available_quizzes().into_iter().find(|quiz| quiz.id() == id)
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    /// Whether the result breakdown is filtered to wrong answers.
    #[must_use]
    pub fn showing_mistakes_only(&self) -> bool {
        self.mistakes_only
    }

    #[must_use]
    pub fn attempts(&self, quiz_id: QuizId) -> u32 {
        self.attempts.get(&quiz_id).copied().unwrap_or(0)
    }

    // ─── login / logout ────────────────────────────────────────────────────────

    /// Restore a stored session on startup.
    ///
    /// Moves to the list when the current-user pointer names a stored
    /// profile; otherwise stays on the login screen.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` unless on the login screen.
    pub async fn resume(&mut self) -> Result<Screen, FlowError> {
        self.expect_screen("resume", &[Screen::Login])?;
        let restored = match self.store.current_user().await {
            Some(user) => self.store.user_data(&user).await,
            None => None,
        };
        match restored {
            Some(stored) => {
                let data = self.resolver.refresh_user_data(&stored);
                self.store.save_user_data(data.clone()).await;
                let data = self.store.user_data(data.user_id()).await.unwrap_or(data);
                tracing::debug!(user = %data.user_id(), "restored session");
                self.user = Some(data);
                self.enter_list();
            }
            None => self.events.emit(&QuizEvent::LoginViewed),
        }
        Ok(self.screen)
    }

    /// Log in as `raw_id`, creating the profile on first use.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::EmptyUserId` for a blank id and
    /// `FlowError::InvalidTransition` unless on the login screen.
    pub async fn login(&mut self, raw_id: &str) -> Result<(), FlowError> {
        self.expect_screen("login", &[Screen::Login])?;
        let user = UserId::new(raw_id).map_err(|_| FlowError::EmptyUserId)?;
        self.events.emit(&QuizEvent::LoginAttempted { user: user.clone() });

        let existing = self.store.user_data(&user).await;
        let is_returning = existing.is_some();
        let data = match existing {
            Some(existing) => self.resolver.refresh_user_data(&existing),
            None => self.resolver.initialize_user_data(&user),
        };
        self.store.save_user_data(data.clone()).await;
        self.store.set_current_user(&user).await;

        let data = self.store.user_data(&user).await.unwrap_or(data);
        tracing::debug!(user = %user, is_returning, "logged in");
        self.user = Some(data);
        self.events.emit(&QuizEvent::LoggedIn { user, is_returning });
        self.enter_list();
        Ok(())
    }

    /// Clear the current user and drop all in-memory state.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NoActiveUser` when nobody is logged in.
    pub async fn logout(&mut self) -> Result<(), FlowError> {
        let user = self.active_user()?;
        self.store.clear_current_user().await;
        tracing::debug!(user = %user, "logged out");
        self.events.emit(&QuizEvent::LoggedOut { user });

        self.user = None;
        self.clear_quiz_state();
        self.attempts.clear();
        self.screen = Screen::Login;
        self.events.emit(&QuizEvent::LoginViewed);
        Ok(())
    }

    // ─── list / article ────────────────────────────────────────────────────────

    /// Pick a quiz from the list.
    ///
    /// Goes to the article screen when the quiz has one, else straight into
    /// the quiz. An id the user cannot take lands on the quiz screen with no
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` unless on the list screen.
    pub fn select_quiz(&mut self, quiz_id: QuizId) -> Result<(), FlowError> {
        self.expect_screen("select_quiz", &[Screen::List])?;
        let user = self.active_user()?;
        self.clear_quiz_state();
        self.selected = Some(quiz_id);

        let Some(quiz) = self.selected_quiz().cloned() else {
            tracing::debug!(%quiz_id, "selected quiz is not available");
            self.screen = Screen::Quiz;
            return Ok(());
        };
        self.events.emit(&QuizEvent::QuizSelected {
            user,
            quiz_id,
            title: quiz.title().to_string(),
        });

        if quiz.has_article() {
            self.article_entered_at = Some(self.clock.now());
            self.screen = Screen::Article;
        } else {
            self.begin_session(quiz, false);
        }
        Ok(())
    }

    /// URL of the selected quiz's article, for the UI to open.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` outside the article and result
    /// screens or when the quiz has no article.
    pub fn open_article(&mut self) -> Result<String, FlowError> {
        let invalid = FlowError::InvalidTransition {
            action: "open_article",
            screen: self.screen,
        };
        self.expect_screen("open_article", &[Screen::Article, Screen::Result])?;
        let user = self.active_user()?;
        let quiz = self.selected_quiz().ok_or(invalid.clone())?;
        let url = quiz.article_url().ok_or(invalid)?.to_string();
        self.events.emit(&QuizEvent::ArticleOpened {
            user,
            quiz_id: quiz.id(),
            url: url.clone(),
        });
        Ok(url)
    }

    /// Leave the article for the quiz.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` unless on the article screen.
    pub fn start_quiz(&mut self) -> Result<(), FlowError> {
        self.expect_screen("start_quiz", &[Screen::Article])?;
        let quiz = self.selected_quiz().cloned().ok_or(FlowError::InvalidTransition {
            action: "start_quiz",
            screen: self.screen,
        })?;
        self.leave_article(true)?;
        self.begin_session(quiz, true);
        Ok(())
    }

    // ─── quiz ──────────────────────────────────────────────────────────────────

    /// Choose an option. Returns `false` if the options are locked.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` without an active session.
    pub fn select_option(&mut self, option: usize) -> Result<bool, FlowError> {
        let session = self.session_mut("select_option")?;
        Ok(session.select(option))
    }

    /// Submit the pending choice. `None` means nothing was selected.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` without an active session.
    pub fn submit_answer(&mut self) -> Result<Option<AnswerFeedback>, FlowError> {
        let now = self.clock.now();
        let user = self.active_user()?;
        let session = self.session_mut("submit_answer")?;
        let quiz_id = session.quiz().id();
        let Some(feedback) = session.submit(now) else {
            return Ok(None);
        };

        self.events.emit(&QuizEvent::QuestionAnswered {
            user: user.clone(),
            quiz_id,
            question_id: feedback.question_id,
            is_correct: feedback.is_correct,
            seconds: feedback.seconds,
        });
        self.events.emit(&QuizEvent::ExplanationViewed {
            user,
            quiz_id,
            question_id: feedback.question_id,
            is_correct: feedback.is_correct,
        });
        Ok(Some(feedback))
    }

    /// Move to the next question, or finish and persist the attempt.
    ///
    /// A finished attempt overwrites earlier progress for the quiz, both in
    /// the user's profile and in the legacy progress list, and shows the
    /// result screen.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` without an active session or
    /// before the current question is submitted.
    pub async fn next_question(&mut self) -> Result<(), FlowError> {
        let now = self.clock.now();
        let user = self.active_user()?;
        let screen = self.screen;
        let session = self.session_mut("next_question")?;
        let quiz = session.quiz().clone();
        let mut advanced = session.clone();
        let step = advanced.advance(now).ok_or(FlowError::InvalidTransition {
            action: "next_question",
            screen,
        })?;

        let outcome = match step {
            Advance::Next(_) => {
                self.session = Some(advanced);
                return Ok(());
            }
            Advance::Finished(outcome) => outcome,
        };
        let progress = outcome.to_progress(&quiz)?;

        self.store.save_user_progress(&user, progress.clone()).await;
        self.store.save_progress(progress.clone()).await;
        if let Some(data) = self.user.as_mut() {
            data.record_progress(progress);
        }

        tracing::debug!(
            quiz_id = %quiz.id(),
            score = outcome.score,
            total = outcome.total,
            "quiz completed"
        );
        self.events.emit(&QuizEvent::QuizCompleted {
            user,
            quiz_id: quiz.id(),
            score: outcome.score,
            total: outcome.total,
            seconds: outcome.elapsed_seconds,
        });
        self.session = None;
        self.outcome = Some(outcome);
        self.mistakes_only = false;
        self.screen = Screen::Result;
        Ok(())
    }

    /// Leave the article or an unfinished quiz without saving anything.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` unless on the article or quiz
    /// screen.
    pub fn abandon_quiz(&mut self) -> Result<(), FlowError> {
        self.expect_screen("abandon_quiz", &[Screen::Article, Screen::Quiz])?;
        let user = self.active_user()?;
        if self.screen == Screen::Article {
            self.leave_article(false)?;
        } else if let Some(session) = &self.session {
            self.events.emit(&QuizEvent::QuizAbandoned {
                user,
                quiz_id: session.quiz().id(),
                question_index: session.current_index(),
            });
        }
        self.clear_quiz_state();
        self.enter_list();
        Ok(())
    }

    // ─── result ────────────────────────────────────────────────────────────────

    /// Return to the list. Unfinished work on other screens is abandoned.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` on the login or list screen.
    pub fn back_to_list(&mut self) -> Result<(), FlowError> {
        match self.screen {
            Screen::Article | Screen::Quiz => self.abandon_quiz(),
            Screen::Result => {
                self.emit_cta(Cta::BackToList)?;
                self.clear_quiz_state();
                self.enter_list();
                Ok(())
            }
            screen => Err(FlowError::InvalidTransition {
                action: "back_to_list",
                screen,
            }),
        }
    }

    /// Start the same quiz over from the first question.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` unless on the result screen.
    pub fn retry(&mut self) -> Result<(), FlowError> {
        self.expect_screen("retry", &[Screen::Result])?;
        let quiz = self.selected_quiz().cloned().ok_or(FlowError::InvalidTransition {
            action: "retry",
            screen: self.screen,
        })?;
        let user = self.active_user()?;
        self.emit_cta(Cta::Retry)?;
        self.events.emit(&QuizEvent::QuizRetried {
            user,
            quiz_id: quiz.id(),
            attempt: self.attempts(quiz.id()) + 1,
        });
        self.outcome = None;
        self.mistakes_only = false;
        self.begin_session(quiz, false);
        Ok(())
    }

    /// Back to the list to pick another quiz.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` unless on the result screen.
    pub fn more_quizzes(&mut self) -> Result<(), FlowError> {
        self.expect_screen("more_quizzes", &[Screen::Result])?;
        self.emit_cta(Cta::MoreQuiz)?;
        self.clear_quiz_state();
        self.enter_list();
        Ok(())
    }

    /// Toggle the result breakdown between all answers and wrong ones.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` unless on the result screen.
    pub fn review_mistakes(&mut self) -> Result<bool, FlowError> {
        self.expect_screen("review_mistakes", &[Screen::Result])?;
        if !self.mistakes_only {
            self.emit_cta(Cta::ReviewWrong)?;
        }
        self.mistakes_only = !self.mistakes_only;
        Ok(self.mistakes_only)
    }

    // ─── helpers ───────────────────────────────────────────────────────────────

    fn expect_screen(&self, action: &'static str, allowed: &[Screen]) -> Result<(), FlowError> {
        if allowed.contains(&self.screen) {
            Ok(())
        } else {
            Err(FlowError::InvalidTransition {
                action,
                screen: self.screen,
            })
        }
    }

    fn active_user(&self) -> Result<UserId, FlowError> {
        self.user
            .as_ref()
            .map(|data| data.user_id().clone())
            .ok_or(FlowError::NoActiveUser)
    }

    fn session_mut(&mut self, action: &'static str) -> Result<&mut QuizSession, FlowError> {
        let screen = self.screen;
        if screen != Screen::Quiz {
            return Err(FlowError::InvalidTransition { action, screen });
        }
        self.session
            .as_mut()
            .ok_or(FlowError::InvalidTransition { action, screen })
    }

    fn enter_list(&mut self) {
        self.screen = Screen::List;
        if let Some(data) = &self.user {
            self.events.emit(&QuizEvent::QuizListViewed {
                user: data.user_id().clone(),
                available: self.resolver.available_quizzes(data).len(),
            });
        }
    }

    fn clear_quiz_state(&mut self) {
        self.selected = None;
        self.session = None;
        self.outcome = None;
        self.mistakes_only = false;
        self.article_entered_at = None;
    }

    fn begin_session(&mut self, quiz: Quiz, from_article: bool) {
        let now = self.clock.now();
        *self.attempts.entry(quiz.id()).or_insert(0) += 1;
        if let Some(data) = &self.user {
            self.events.emit(&QuizEvent::QuizStarted {
                user: data.user_id().clone(),
                quiz_id: quiz.id(),
                title: quiz.title().to_string(),
                from_article,
            });
        }
        self.selected = Some(quiz.id());
        self.session = Some(QuizSession::new(quiz, now));
        self.screen = Screen::Quiz;
    }

    fn leave_article(&mut self, started_quiz: bool) -> Result<(), FlowError> {
        let user = self.active_user()?;
        let quiz_id = self.selected.ok_or(FlowError::InvalidTransition {
            action: "leave_article",
            screen: self.screen,
        })?;
        let seconds = self
            .article_entered_at
            .take()
            .map_or(0, |entered| seconds_between(entered, self.clock.now()));
        self.events.emit(&QuizEvent::ArticleLeft {
            user,
            quiz_id,
            seconds,
            started_quiz,
        });
        Ok(())
    }

    fn emit_cta(&self, cta: Cta) -> Result<(), FlowError> {
        let user = self.active_user()?;
        let (quiz_id, score, accuracy) = match &self.outcome {
            Some(outcome) => (outcome.quiz_id, outcome.score, outcome.accuracy_percent()),
            None => {
                return Err(FlowError::InvalidTransition {
                    action: cta.as_str(),
                    screen: self.screen,
                });
            }
        };
        self.events.emit(&QuizEvent::CtaClicked {
            user,
            quiz_id,
            cta,
            score,
            accuracy,
        });
        Ok(())
    }
}
