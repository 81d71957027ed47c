//! Emission errors.

use inkwell::builder::BuilderError;
use thiserror::Error;

/// Failure while emitting debug metadata into a module.
///
/// All variants are usage errors: the driver reports the message and stops.
#[derive(Debug, Error)]
pub enum DebugEmitError {
    /// The intrinsic catalog did not produce a function.
    #[error("intrinsic lookup for llvm.dbg.declare did not produce a function")]
    NotAFunction,
    /// The catalog produced a function with the wrong name.
    #[error("wanted llvm.dbg.declare but got: {found}")]
    NameMismatch { found: String },
    /// A null node was passed where a metadata node is required.
    #[error("expected a metadata node, got a null operand")]
    NotMetadata,
    #[error("failed to add operand to named metadata `{name}`: {message}")]
    NamedMetadata {
        name: &'static str,
        message: &'static str,
    },
    #[error(transparent)]
    Builder(#[from] BuilderError),
}
