use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quiz_core::Catalog;
use quiz_core::time::fixed_now;
use services::{AppServices, Clock, EventBus, QuizFlow};

use crate::context::{AppContext, UiApp, build_app_context};
use crate::views::QuizShell;

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn new_flow(&self) -> QuizFlow {
        self.services.flow()
    }
}

#[derive(Props, Clone)]
struct ShellHarnessProps {
    ctx: AppContext,
}

impl PartialEq for ShellHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ShellHarness(props: ShellHarnessProps) -> Element {
    use_context_provider(|| props.ctx.clone());
    rsx! { QuizShell {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Services over in-memory storage, the bundled catalog and a fixed clock.
pub fn test_services() -> AppServices {
    AppServices::in_memory(
        Clock::fixed(fixed_now()),
        Catalog::bundled().expect("bundled catalog"),
        EventBus::new(),
    )
}

/// Mount the shell over a flow the test has already driven.
pub fn setup_shell_harness(services: &AppServices, flow: QuizFlow) -> ViewHarness {
    let app: Arc<dyn UiApp> = Arc::new(TestApp {
        services: services.clone(),
    });
    let ctx = build_app_context(&app).with_initial_flow(flow);
    let dom = VirtualDom::new_with_props(ShellHarness, ShellHarnessProps { ctx });
    ViewHarness { dom }
}
