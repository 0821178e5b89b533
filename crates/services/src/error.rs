//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::CatalogError;
use quiz_core::model::ProgressError;
use storage::sqlite::SqliteInitError;

use crate::sessions::Screen;

/// Errors emitted by `QuizFlow`.
///
/// A flow that returns an error has not changed state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlowError {
    #[error("user id cannot be empty")]
    EmptyUserId,
    #[error("`{action}` is not available on the {screen} screen")]
    InvalidTransition {
        action: &'static str,
        screen: Screen,
    },
    #[error("no user is logged in")]
    NoActiveUser,
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
