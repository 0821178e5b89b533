mod intent;
mod quiz_list_vm;
mod quiz_vm;
mod result_vm;
mod time_fmt;

pub use intent::{IntentEffect, IntentGate, QuizIntent, apply_intent};
pub use quiz_list_vm::{QuizCardVm, QuizListVm, difficulty_class, map_quiz_list};
pub use quiz_vm::{
    ArticleVm, ExplanationVm, OptionState, OptionVm, QuizVm, map_article, map_quiz,
};
pub use result_vm::{PerformanceTier, ResultRowVm, ResultVm, map_result};
pub use time_fmt::{format_date, format_duration};
