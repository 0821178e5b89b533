use dioxus::prelude::*;

use crate::vm::{ExplanationVm, OptionVm, QuizIntent, QuizVm};

#[component]
pub fn QuizView(vm: QuizVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let shown = vm.explanation.is_some();
    rsx! {
        div { class: "page quiz-page",
            header { class: "quiz-header",
                h2 { "{vm.title}" }
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::Abandon),
                    "Quit"
                }
            }
            div { class: "quiz-progress",
                span { class: "quiz-progress__label", "{vm.position_label}" }
                div { class: "quiz-progress__bar",
                    div {
                        class: "quiz-progress__fill",
                        style: "width: {vm.progress_percent}%",
                    }
                }
                if let Some(score) = vm.running_score.as_ref() {
                    span { class: "quiz-progress__score", "{score}" }
                }
            }
            p { class: "quiz-kind", "{vm.kind_label}" }
            h3 { class: "quiz-prompt", "{vm.prompt}" }
            div { class: "quiz-options",
                for option in vm.options {
                    OptionButton { key: "{option.index}", option, on_intent }
                }
            }
            if let Some(explanation) = vm.explanation {
                Explanation { explanation }
            }
            div { class: "actions",
                if shown {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::Next),
                        "{vm.next_label}"
                    }
                } else {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: !vm.can_submit,
                        onclick: move |_| on_intent.call(QuizIntent::Submit),
                        "Submit answer"
                    }
                }
            }
        }
    }
}

#[component]
fn OptionButton(option: OptionVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let index = option.index;
    rsx! {
        button {
            class: "{option.state.class()}",
            r#type: "button",
            disabled: option.locked,
            onclick: move |_| on_intent.call(QuizIntent::SelectOption(index)),
            "{option.label}"
        }
    }
}

#[component]
fn Explanation(explanation: ExplanationVm) -> Element {
    let (class, verdict) = if explanation.is_correct {
        ("explanation explanation-correct", "Correct!")
    } else {
        ("explanation explanation-wrong", "Not quite.")
    };
    rsx! {
        div { class: "{class}",
            p { class: "explanation__verdict", "{verdict}" }
            if !explanation.is_correct {
                p { class: "explanation__answer", "Correct answer: {explanation.correct_label}" }
            }
            p { class: "explanation__text", "{explanation.text}" }
        }
    }
}
