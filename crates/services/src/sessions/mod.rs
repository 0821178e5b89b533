mod flow;
mod quiz_session;

pub use crate::error::FlowError;
pub use flow::{QuizFlow, Screen};
pub use quiz_session::{Advance, AnswerFeedback, QuizOutcome, QuizSession, SubmittedAnswer};
