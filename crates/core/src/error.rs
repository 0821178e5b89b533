use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{ProgressError, QuizError, UserIdError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    UserId(#[from] UserIdError),
}
