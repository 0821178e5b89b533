//! Domain events emitted by the quiz flow.
//!
//! The flow only knows about [`EventBus`]; reporting lives in listeners such
//! as [`crate::analytics::AnalyticsForwarder`].

use std::sync::{Arc, Mutex};

use quiz_core::model::{QuestionId, QuizId, UserId};

/// Post-quiz call to action on the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cta {
    Retry,
    MoreQuiz,
    ReviewWrong,
    BackToList,
}

impl Cta {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Cta::Retry => "retry",
            Cta::MoreQuiz => "more_quiz",
            Cta::ReviewWrong => "review_wrong",
            Cta::BackToList => "back_to_list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizEvent {
    LoginViewed,
    LoginAttempted {
        user: UserId,
    },
    LoggedIn {
        user: UserId,
        is_returning: bool,
    },
    LoggedOut {
        user: UserId,
    },
    QuizListViewed {
        user: UserId,
        available: usize,
    },
    QuizSelected {
        user: UserId,
        quiz_id: QuizId,
        title: String,
    },
    ArticleOpened {
        user: UserId,
        quiz_id: QuizId,
        url: String,
    },
    /// The article screen was left, either into the quiz or back out.
    ArticleLeft {
        user: UserId,
        quiz_id: QuizId,
        seconds: u64,
        started_quiz: bool,
    },
    QuizStarted {
        user: UserId,
        quiz_id: QuizId,
        title: String,
        from_article: bool,
    },
    QuestionAnswered {
        user: UserId,
        quiz_id: QuizId,
        question_id: QuestionId,
        is_correct: bool,
        seconds: u64,
    },
    ExplanationViewed {
        user: UserId,
        quiz_id: QuizId,
        question_id: QuestionId,
        is_correct: bool,
    },
    QuizCompleted {
        user: UserId,
        quiz_id: QuizId,
        score: u32,
        total: usize,
        seconds: u64,
    },
    QuizAbandoned {
        user: UserId,
        quiz_id: QuizId,
        question_index: usize,
    },
    QuizRetried {
        user: UserId,
        quiz_id: QuizId,
        attempt: u32,
    },
    CtaClicked {
        user: UserId,
        quiz_id: QuizId,
        cta: Cta,
        score: u32,
        accuracy: u32,
    },
}

/// Receives every event the flow emits. Must not block.
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &QuizEvent);
}

/// Fan-out to registered listeners, in registration order.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Vec<Arc<dyn EventListener>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn EventListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn emit(&self, event: &QuizEvent) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Listener that keeps every event in memory.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<QuizEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<QuizEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.events.lock() {
            guard.clear();
        }
    }
}

impl EventListener for EventLog {
    fn on_event(&self, event: &QuizEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event.clone());
        }
    }
}
