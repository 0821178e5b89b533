use dioxus::prelude::*;

use crate::vm::QuizIntent;

#[component]
pub fn LoginView(on_intent: EventHandler<QuizIntent>) -> Element {
    let mut draft = use_signal(String::new);
    let is_blank = draft.read().trim().is_empty();

    rsx! {
        div { class: "page login-page",
            h1 { class: "login-title", "QuizDev" }
            p { class: "login-subtitle", "Read an article, then test what you learned." }
            form {
                class: "login-form",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    let value = draft.read().clone();
                    if !value.trim().is_empty() {
                        on_intent.call(QuizIntent::Login(value));
                    }
                },
                label { r#for: "login-user", "User id" }
                input {
                    id: "login-user",
                    r#type: "text",
                    placeholder: "Enter your user id",
                    autocomplete: "off",
                    value: "{draft}",
                    oninput: move |evt| draft.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: is_blank,
                    "Start"
                }
            }
        }
    }
}
