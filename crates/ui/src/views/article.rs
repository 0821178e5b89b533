use dioxus::prelude::*;

use crate::vm::{ArticleVm, QuizIntent};

#[component]
pub fn ArticleView(vm: ArticleVm, on_intent: EventHandler<QuizIntent>) -> Element {
    rsx! {
        div { class: "page article-page",
            h2 { "{vm.title}" }
            div { class: "article-meta",
                span { class: "{vm.difficulty_class}", "{vm.difficulty_label}" }
                span { "{vm.question_count} questions" }
            }
            p { class: "article-description", "{vm.description}" }
            p { class: "article-hint",
                "Read the article first, then come back to start the quiz."
            }
            p { class: "article-url", "{vm.url}" }
            div { class: "actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::OpenArticle),
                    "Open article"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::StartQuiz),
                    "Start quiz"
                }
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::BackToList),
                    "Back to list"
                }
            }
        }
    }
}
