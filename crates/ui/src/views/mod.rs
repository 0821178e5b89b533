mod article;
mod login;
mod quiz;
mod quiz_list;
mod result;
mod shell;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use article::ArticleView;
pub use login::LoginView;
pub use quiz::QuizView;
pub use quiz_list::QuizListView;
pub use result::ResultView;
pub use shell::QuizShell;
pub use state::ViewError;
