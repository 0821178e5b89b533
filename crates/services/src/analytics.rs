//! Forwards domain events to an analytics sink as flat name/parameter pairs.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::events::{Cta, EventListener, QuizEvent};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalyticsValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for AnalyticsValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AnalyticsValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for AnalyticsValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for AnalyticsValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for AnalyticsValue {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for AnalyticsValue {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for AnalyticsValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// One analytics hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub name: &'static str,
    pub params: BTreeMap<&'static str, AnalyticsValue>,
}

impl AnalyticsEvent {
    fn new(name: &'static str, category: &'static str, label: &'static str) -> Self {
        let mut params = BTreeMap::new();
        params.insert("event_category", AnalyticsValue::from(category));
        params.insert("event_label", AnalyticsValue::from(label));
        Self { name, params }
    }

    fn with(mut self, key: &'static str, value: impl Into<AnalyticsValue>) -> Self {
        self.params.insert(key, value.into());
        self
    }

    #[must_use]
    pub fn param(&self, key: &str) -> Option<&AnalyticsValue> {
        self.params.get(key)
    }
}

/// Fire-and-forget destination. Implementations must not block or panic.
pub trait AnalyticsSink: Send + Sync {
    fn send(&self, event: &AnalyticsEvent);
}

/// Sink used when analytics is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn send(&self, _event: &AnalyticsEvent) {}
}

/// Writes each hit as a debug log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn send(&self, event: &AnalyticsEvent) {
        let params = serde_json::to_string(&event.params).unwrap_or_default();
        tracing::debug!(target: "analytics", name = event.name, %params, "analytics event");
    }
}

/// [`EventListener`] that translates events and hands them to a sink.
#[derive(Clone)]
pub struct AnalyticsForwarder {
    sink: Arc<dyn AnalyticsSink>,
}

impl AnalyticsForwarder {
    #[must_use]
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink }
    }
}

impl EventListener for AnalyticsForwarder {
    fn on_event(&self, event: &QuizEvent) {
        for hit in translate(event) {
            self.sink.send(&hit);
        }
    }
}

fn percent(score: u32, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = u32::try_from(total).map_or(f64::from(u32::MAX), f64::from);
    f64::from(score) * 100.0 / total
}

/// Map one domain event to the analytics hits it produces.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate(event: &QuizEvent) -> Vec<AnalyticsEvent> {
    match event {
        QuizEvent::LoginViewed => vec![AnalyticsEvent::new(
            "user_login_viewed",
            "authentication",
            "login_screen",
        )],
        QuizEvent::LoginAttempted { user } => vec![
            AnalyticsEvent::new("user_login_attempted", "authentication", "login_attempt")
                .with("user_id", user.as_str()),
        ],
        QuizEvent::LoggedIn { user, is_returning } => {
            let label = if *is_returning {
                "returning_user"
            } else {
                "new_user"
            };
            vec![
                AnalyticsEvent::new("user_logged_in", "authentication", label)
                    .with("user_id", user.as_str()),
            ]
        }
        QuizEvent::LoggedOut { user } => vec![
            AnalyticsEvent::new("user_logged_out", "authentication", "logout")
                .with("user_id", user.as_str()),
        ],
        QuizEvent::QuizListViewed { user, available } => vec![
            AnalyticsEvent::new("quiz_list_viewed", "engagement", "quiz_discovery")
                .with("user_id", user.as_str())
                .with("available_quiz_count", *available),
        ],
        QuizEvent::QuizSelected {
            quiz_id, title, ..
        } => vec![
            AnalyticsEvent::new("article_card_clicked", "engagement", "quiz_selection")
                .with("quiz_id", quiz_id.value())
                .with("quiz_title", title.as_str()),
        ],
        QuizEvent::ArticleOpened { user, quiz_id, url } => vec![
            AnalyticsEvent::new("article_link_opened", "engagement", "external_article_view")
                .with("quiz_id", quiz_id.value())
                .with("article_url", url.as_str()),
            AnalyticsEvent::new(
                "experiment_article_start_reading",
                "experiment_flow",
                "article_reading_started",
            )
            .with("user_id", user.as_str())
            .with("quiz_id", quiz_id.value())
            .with("article_url", url.as_str()),
        ],
        QuizEvent::ArticleLeft {
            user,
            quiz_id,
            seconds,
            started_quiz: true,
        } => vec![
            AnalyticsEvent::new("article_read_time", "engagement", "article_engagement")
                .with("quiz_id", quiz_id.value())
                .with("time_spent_seconds", *seconds),
            AnalyticsEvent::new(
                "experiment_article_completed",
                "experiment_flow",
                "article_reading_finished",
            )
            .with("user_id", user.as_str())
            .with("quiz_id", quiz_id.value())
            .with("reading_time_seconds", *seconds),
        ],
        QuizEvent::ArticleLeft {
            user,
            quiz_id,
            seconds,
            started_quiz: false,
        } => vec![
            AnalyticsEvent::new(
                "experiment_article_abandoned",
                "experiment_flow",
                "article_reading_abandoned",
            )
            .with("user_id", user.as_str())
            .with("quiz_id", quiz_id.value())
            .with("time_spent_seconds", *seconds),
        ],
        QuizEvent::QuizStarted {
            user,
            quiz_id,
            title,
            from_article,
        } => vec![
            AnalyticsEvent::new("quiz_started", "learning", "quiz_begin")
                .with("quiz_id", quiz_id.value())
                .with("quiz_title", title.as_str()),
            AnalyticsEvent::new("start_quiz", "experiment", "quiz_start")
                .with("user_id", user.as_str())
                .with("quiz_id", quiz_id.value())
                .with("quiz_title", title.as_str()),
            AnalyticsEvent::new(
                "experiment_quiz_transition",
                "experiment_flow",
                "article_to_quiz_conversion",
            )
            .with("user_id", user.as_str())
            .with("quiz_id", quiz_id.value())
            .with("from_article", *from_article),
        ],
        QuizEvent::QuestionAnswered {
            quiz_id,
            question_id,
            is_correct,
            seconds,
            ..
        } => vec![
            AnalyticsEvent::new("question_answered", "learning", "question_response")
                .with("quiz_id", quiz_id.value())
                .with("question_id", question_id.value())
                .with("is_correct", *is_correct)
                .with("time_taken_seconds", *seconds),
        ],
        QuizEvent::ExplanationViewed {
            user,
            quiz_id,
            question_id,
            is_correct,
        } => vec![
            AnalyticsEvent::new("explanation_viewed", "learning", "explanation_engagement")
                .with("quiz_id", quiz_id.value())
                .with("question_id", question_id.value()),
            AnalyticsEvent::new("view_explanation", "experiment", "explanation_viewed")
                .with("user_id", user.as_str())
                .with("quiz_id", quiz_id.value())
                .with("question_id", question_id.value())
                .with("is_wrong_answer", !*is_correct),
        ],
        QuizEvent::QuizCompleted {
            user,
            quiz_id,
            score,
            total,
            seconds,
        } => {
            let rate = percent(*score, *total);
            vec![
                AnalyticsEvent::new("quiz_completed", "learning", "quiz_finish")
                    .with("quiz_id", quiz_id.value())
                    .with("score", *score)
                    .with("total_questions", *total)
                    .with("completion_time_seconds", *seconds)
                    .with("success_rate", rate),
                AnalyticsEvent::new("finish_quiz", "experiment", "quiz_completion")
                    .with("user_id", user.as_str())
                    .with("quiz_id", quiz_id.value())
                    .with("score", *score)
                    .with("total_questions", *total)
                    .with("time_taken_seconds", *seconds)
                    .with("accuracy", rate.round()),
            ]
        }
        QuizEvent::QuizAbandoned {
            quiz_id,
            question_index,
            ..
        } => vec![
            AnalyticsEvent::new("quiz_abandoned", "learning", "quiz_dropout")
                .with("quiz_id", quiz_id.value())
                .with("questions_completed", *question_index),
        ],
        QuizEvent::QuizRetried {
            quiz_id, attempt, ..
        } => vec![
            AnalyticsEvent::new("retry_quiz", "engagement", "quiz_retry")
                .with("quiz_id", quiz_id.value())
                .with("attempt_number", *attempt),
        ],
        QuizEvent::CtaClicked {
            user,
            quiz_id,
            cta,
            score,
            accuracy,
        } => {
            let mut hits = vec![
                AnalyticsEvent::new("cta_click", "experiment", "post_quiz_action")
                    .with("user_id", user.as_str())
                    .with("quiz_id", quiz_id.value())
                    .with("cta_type", cta.as_str())
                    .with("user_score", *score),
            ];
            if matches!(cta, Cta::ReviewWrong | Cta::MoreQuiz) {
                hits.push(
                    AnalyticsEvent::new(
                        "experiment_cta_clicked",
                        "experiment_conversion",
                        "post_quiz_action",
                    )
                    .with("user_id", user.as_str())
                    .with("quiz_id", quiz_id.value())
                    .with("cta_type", cta.as_str())
                    .with("user_score", *score)
                    .with("user_accuracy", *accuracy),
                );
            }
            hits
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionId, QuizId, UserId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        hits: Mutex<Vec<AnalyticsEvent>>,
    }

    impl AnalyticsSink for RecordingSink {
        fn send(&self, event: &AnalyticsEvent) {
            self.hits.lock().unwrap().push(event.clone());
        }
    }

    fn user() -> UserId {
        UserId::new("alice").unwrap()
    }

    #[test]
    fn login_label_depends_on_returning_flag() {
        let hits = translate(&QuizEvent::LoggedIn {
            user: user(),
            is_returning: true,
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "user_logged_in");
        assert_eq!(hits[0].param("event_label"), Some(&"returning_user".into()));
        assert_eq!(hits[0].param("user_id"), Some(&"alice".into()));
    }

    #[test]
    fn completion_reports_success_rate() {
        let hits = translate(&QuizEvent::QuizCompleted {
            user: user(),
            quiz_id: QuizId::new(3),
            score: 2,
            total: 3,
            seconds: 41,
        });
        let names: Vec<_> = hits.iter().map(|hit| hit.name).collect();
        assert_eq!(names, vec!["quiz_completed", "finish_quiz"]);
        assert_eq!(hits[0].param("completion_time_seconds"), Some(&AnalyticsValue::Int(41)));
        let Some(AnalyticsValue::Float(rate)) = hits[0].param("success_rate") else {
            panic!("success_rate should be a float");
        };
        assert!((rate - 66.666).abs() < 0.01);
        assert_eq!(hits[1].param("accuracy"), Some(&AnalyticsValue::Float(67.0)));
    }

    #[test]
    fn explanation_marks_wrong_answers() {
        let hits = translate(&QuizEvent::ExplanationViewed {
            user: user(),
            quiz_id: QuizId::new(1),
            question_id: QuestionId::new(2),
            is_correct: false,
        });
        assert_eq!(hits[1].name, "view_explanation");
        assert_eq!(hits[1].param("is_wrong_answer"), Some(&AnalyticsValue::Bool(true)));
    }

    #[test]
    fn only_conversion_ctas_emit_experiment_hit() {
        let cta = |cta| QuizEvent::CtaClicked {
            user: user(),
            quiz_id: QuizId::new(1),
            cta,
            score: 1,
            accuracy: 50,
        };
        assert_eq!(translate(&cta(Cta::Retry)).len(), 1);
        assert_eq!(translate(&cta(Cta::BackToList)).len(), 1);
        let review = translate(&cta(Cta::ReviewWrong));
        assert_eq!(review.len(), 2);
        assert_eq!(review[0].param("cta_type"), Some(&"review_wrong".into()));
        assert_eq!(review[1].param("user_accuracy"), Some(&AnalyticsValue::Int(50)));
    }

    #[test]
    fn forwarder_hands_every_hit_to_the_sink() {
        let sink = Arc::new(RecordingSink::default());
        let forwarder = AnalyticsForwarder::new(sink.clone());
        forwarder.on_event(&QuizEvent::QuizStarted {
            user: user(),
            quiz_id: QuizId::new(4),
            title: "Cargo".into(),
            from_article: true,
        });
        let hits = sink.hits.lock().unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[2].param("from_article"), Some(&AnalyticsValue::Bool(true)));
    }

    #[test]
    fn params_serialize_as_flat_json() {
        let hit = &translate(&QuizEvent::LoginViewed)[0];
        let json = serde_json::to_value(&hit.params).unwrap();
        assert_eq!(json["event_category"], "authentication");
    }

    #[test]
    fn noop_and_tracing_sinks_accept_events() {
        let hit = &translate(&QuizEvent::LoginViewed)[0];
        NoopSink.send(hit);
        TracingSink.send(hit);
    }
}
