//! Export Errors
//!
//! Failures that abort the export of one class. Advisories (a missing policy,
//! for instance) are never errors; they go through the `Logger`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// The class declares public constructors but none could be selected as
    /// the primary initializer. This is a breach of the declaration model.
    #[error("no constructor candidate for class `{class}`")]
    NoConstructorCandidate { class: String },

    #[error("declaration `{name}` not found")]
    UnknownDeclaration { name: String },

    #[error("declaration `{name}` is not a class")]
    NotAClass { name: String },

    #[error("declaration `{name}` is not an enumeration")]
    NotAnEnumeration { name: String },
}

pub type Result<T> = std::result::Result<T, ExportError>;
