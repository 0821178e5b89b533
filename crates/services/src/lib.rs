#![forbid(unsafe_code)]

pub mod analytics;
pub mod app_services;
pub mod error;
pub mod events;
pub mod resolver;
pub mod sessions;

pub use quiz_core::Clock;

pub use analytics::{AnalyticsEvent, AnalyticsForwarder, AnalyticsSink, AnalyticsValue, NoopSink, TracingSink};
pub use app_services::AppServices;
pub use error::{AppServicesError, FlowError};
pub use events::{Cta, EventBus, EventListener, EventLog, QuizEvent};
pub use resolver::{AssignmentInfo, Resolver};
pub use sessions::{
    Advance, AnswerFeedback, QuizFlow, QuizOutcome, QuizSession, Screen, SubmittedAnswer,
};
