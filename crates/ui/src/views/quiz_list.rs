use dioxus::prelude::*;

use crate::vm::{QuizCardVm, QuizIntent, QuizListVm};

#[component]
pub fn QuizListView(vm: QuizListVm, on_intent: EventHandler<QuizIntent>) -> Element {
    rsx! {
        div { class: "page list-page",
            header { class: "list-header",
                h2 { "Your quizzes" }
                if vm.is_special_user {
                    span { class: "badge badge-special", "Special access" }
                }
                if let Some(ratio) = vm.assignment_ratio.as_ref() {
                    p { class: "list-assignment",
                        if vm.is_directly_assigned {
                            "Assigned to you: {ratio}"
                        } else {
                            "Available: {ratio}"
                        }
                    }
                }
            }
            if vm.cards.is_empty() {
                p { class: "list-empty", "No quizzes are available for you yet." }
            } else {
                ul { class: "quiz-cards",
                    for card in vm.cards {
                        QuizCard { key: "{card.id}", card, on_intent }
                    }
                }
            }
        }
    }
}

#[component]
fn QuizCard(card: QuizCardVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let id = card.id;
    rsx! {
        li { class: "quiz-card",
            button {
                class: "quiz-card__button",
                r#type: "button",
                onclick: move |_| on_intent.call(QuizIntent::SelectQuiz(id)),
                div { class: "quiz-card__top",
                    h3 { class: "quiz-card__title", "{card.title}" }
                    span { class: "{card.difficulty_class}", "{card.difficulty_label}" }
                }
                p { class: "quiz-card__description", "{card.description}" }
                div { class: "quiz-card__meta",
                    span { "{card.question_count} questions" }
                    if card.has_article {
                        span { class: "quiz-card__article", "Article included" }
                    }
                    if let Some(score) = card.completed_score.as_ref() {
                        span { class: "quiz-card__score", "Completed: {score}" }
                    }
                    if let Some(date) = card.completed_on.as_ref() {
                        span { class: "quiz-card__date", "{date}" }
                    }
                }
            }
        }
    }
}
