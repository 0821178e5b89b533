use dioxus::document::eval;
use dioxus::prelude::*;
use services::{QuizFlow, Screen};

use crate::context::AppContext;
use crate::views::{
    ArticleView, LoginView, QuizListView, QuizView, ResultView, ViewError,
};
use crate::vm::{
    IntentEffect, IntentGate, QuizIntent, apply_intent, map_article, map_quiz, map_quiz_list,
    map_result,
};

/// Owns the flow and routes each screen to its view.
#[component]
pub fn QuizShell() -> Element {
    let ctx = use_context::<AppContext>();
    let flow = use_signal(move || ctx.take_flow());
    let error = use_signal(|| None::<ViewError>);
    let gate = use_signal(IntentGate::default);

    let dispatch = use_callback(move |intent: QuizIntent| {
        let mut flow = flow;
        let mut error = error;
        let mut gate = gate;
        if !gate.write().try_begin() {
            tracing::debug!(?intent, "intent dropped while another is running");
            return;
        }
        spawn(async move {
            // Work on a copy so the current screen stays rendered meanwhile.
            let mut working = flow.read().clone();
            let result = apply_intent(&mut working, intent).await;
            flow.set(working);
            gate.write().finish();

            match result {
                Ok(IntentEffect::None) => error.set(None),
                Ok(IntentEffect::OpenUrl(url)) => {
                    error.set(None);
                    open_in_browser(&url).await;
                }
                Err(err) => {
                    tracing::debug!(%err, "intent rejected");
                    error.set(Some(ViewError::from(&err)));
                }
            }
        });
    });

    let current = flow.read();
    let user_label = current.user().map(|data| data.user_id().to_string());
    let body = screen_body(&current, dispatch);
    let busy = gate.read().is_busy();
    let shell_class = if busy { "shell shell-busy" } else { "shell" };

    rsx! {
        div { class: "{shell_class}", aria_busy: "{busy}",
            if let Some(user) = user_label {
                header { class: "shell-header",
                    span { class: "shell-brand", "QuizDev" }
                    span { class: "shell-user", "{user}" }
                    button {
                        class: "btn btn-link",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| dispatch.call(QuizIntent::Logout),
                        "Log out"
                    }
                }
            }
            if let Some(err) = *error.read() {
                p { class: "shell-error", role: "alert", "{err.message()}" }
            }
            main { class: "shell-body", {body} }
        }
    }
}

async fn open_in_browser(url: &str) {
    let script = format!("return window.open({url:?}, '_blank') !== null;");
    match eval(&script).join::<bool>().await {
        Ok(true) => {}
        Ok(false) => tracing::debug!(%url, "article window was blocked"),
        Err(err) => tracing::debug!(%url, ?err, "failed to open article"),
    }
}

fn screen_body(flow: &QuizFlow, on_intent: Callback<QuizIntent>) -> Element {
    match flow.screen() {
        Screen::Login => rsx! {
            LoginView { on_intent }
        },
        Screen::List => {
            let vm = map_quiz_list(flow);
            rsx! {
                QuizListView { vm, on_intent }
            }
        }
        Screen::Article => match map_article(flow) {
            Some(vm) => rsx! {
                ArticleView { vm, on_intent }
            },
            None => rsx! {
                QuizNotFound { on_intent }
            },
        },
        Screen::Quiz => match map_quiz(flow) {
            Some(vm) => rsx! {
                QuizView { vm, on_intent }
            },
            None => rsx! {
                QuizNotFound { on_intent }
            },
        },
        Screen::Result => match map_result(flow) {
            Some(vm) => rsx! {
                ResultView { vm, on_intent }
            },
            None => rsx! {
                QuizNotFound { on_intent }
            },
        },
    }
}

#[component]
fn QuizNotFound(on_intent: EventHandler<QuizIntent>) -> Element {
    rsx! {
        div { class: "page not-found",
            h2 { "Quiz not found" }
            p { "This quiz does not exist or is not assigned to you." }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_intent.call(QuizIntent::BackToList),
                "Back to list"
            }
        }
    }
}
