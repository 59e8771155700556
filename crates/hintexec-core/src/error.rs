//! Core error types for hintexec-core.
//!
//! Uses `thiserror` for structured, matchable error variants.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised by user code (predicates, hooks, function bodies).
///
/// The engine never inspects or wraps these; they travel back to the caller
/// exactly as they were produced.
pub type Raised = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core errors produced by the hintexec-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value did not have the kind an accessor required.
    #[error("expected a value of kind {expected}, got {got}")]
    KindMismatch { expected: ValueKind, got: ValueKind },
}
