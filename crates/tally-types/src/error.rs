use thiserror::Error;

/// Errors produced when constructing identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("container identifier must not be empty")]
    EmptyContainer,

    #[error("object key must not be empty")]
    EmptyKey,
}
