#![deny(clippy::all)]

//! Binding Exporter
//!
//! Turns a resolved C++ class declaration into the ordered section buffers of
//! a scripting-runtime binding (`class_<...>` statements, overload helpers,
//! operator definitions and nested scopes).

pub mod declarations;
pub mod enumeration;
mod error;
pub mod export_info;
pub mod exporter;
pub mod logging;
pub mod policies;
pub mod sections;
mod util;

// Re-exports
pub use declarations::{
    Callable, ClassDecl, ClassSnapshot, ClassVariable, Declaration, DeclarationGraph, EnumDecl,
    Member, NestedRef, Parameter, Type, TypeSuffix, Typedef, Visibility,
};
pub use enumeration::EnumExporter;
pub use error::{ExportError, Result};
pub use export_info::{AddedMethod, ExportInfo, ExportSettings, Policy, ReturnValueKind, Wrapper};
pub use exporter::{ClassExporter, ExportContext};
pub use logging::{ConsoleLogger, LogLevel, Logger, NullLogger};
pub use sections::{ExportResult, Section, SectionBuffer};
