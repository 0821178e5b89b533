use std::sync::{Arc, Mutex};

use services::QuizFlow;

pub trait UiApp: Send + Sync {
    /// A flow on the login screen, backed by the app's storage.
    fn new_flow(&self) -> QuizFlow;
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    initial_flow: Arc<Mutex<Option<QuizFlow>>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app: Arc::clone(app),
            initial_flow: Arc::new(Mutex::new(None)),
        }
    }

    /// Hand the shell a flow that was already driven, e.g. a resumed session.
    #[must_use]
    pub fn with_initial_flow(self, flow: QuizFlow) -> Self {
        if let Ok(mut slot) = self.initial_flow.lock() {
            *slot = Some(flow);
        }
        self
    }

    /// The prepared flow on first call, a fresh one afterwards.
    #[must_use]
    pub fn take_flow(&self) -> QuizFlow {
        self.initial_flow
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
            .unwrap_or_else(|| self.app.new_flow())
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
