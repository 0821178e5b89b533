use dioxus::prelude::*;

use crate::vm::{QuizIntent, ResultRowVm, ResultVm};

#[component]
pub fn ResultView(vm: ResultVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let review_label = if vm.mistakes_only {
        "Show all answers"
    } else {
        "Review mistakes"
    };
    rsx! {
        div { class: "page result-page",
            h2 { "{vm.title}" }
            p { class: "{vm.tier.class()}", "{vm.tier.message()}" }
            dl { class: "result-stats",
                dt { "Score" }
                dd { "{vm.score} / {vm.total}" }

                dt { "Accuracy" }
                dd { "{vm.accuracy}%" }

                dt { "Time" }
                dd { "{vm.time_label}" }

                dt { "Wrong" }
                dd { "{vm.wrong_count}" }
            }
            div { class: "actions",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::Retry),
                    "Retry"
                }
                if vm.wrong_count > 0 {
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::ReviewMistakes),
                        "{review_label}"
                    }
                }
                if vm.has_article {
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::OpenArticle),
                        "Reread article"
                    }
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::MoreQuizzes),
                    "More quizzes"
                }
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::BackToList),
                    "Back to list"
                }
            }
            ol { class: "result-rows",
                for row in vm.rows {
                    ResultRow { key: "{row.number}", row }
                }
            }
        }
    }
}

#[component]
fn ResultRow(row: ResultRowVm) -> Element {
    let class = if row.is_correct {
        "result-row result-row-correct"
    } else {
        "result-row result-row-wrong"
    };
    rsx! {
        li { class: "{class}",
            p { class: "result-row__prompt", "{row.number}. {row.prompt}" }
            p { class: "result-row__answer", "Your answer: {row.your_answer}" }
            if !row.is_correct {
                p { class: "result-row__correct", "Correct answer: {row.correct_answer}" }
            }
            if let Some(text) = row.explanation.as_ref() {
                p { class: "result-row__explanation", "{text}" }
            }
        }
    }
}
