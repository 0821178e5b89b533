mod ids;
mod progress;
mod question;
mod quiz;
mod user;

pub use ids::{ParseIdError, QuestionId, QuizId};
pub use progress::{ProgressError, UserData, UserProgress, upsert_progress};
pub use question::{Question, QuestionError, QuestionKind};
pub use quiz::{AccessPolicy, Difficulty, Quiz, QuizError};
pub use user::{UserId, UserIdError};
