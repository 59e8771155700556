//! Annotation normalization.
//!
//! External tooling expects annotations to be plain type hints. These
//! helpers rewrite the visible annotations of a wrapped callable so that
//! every specification is replaced by its declared hint, or dropped when it
//! declares none. The pipelines the engine runs are untouched.

use crate::binding::{Annotation, Annotations};
use crate::engine::Enforced;

/// Replaces the visible annotations of `enforced` with their plain hints.
pub fn cleanup_annotations(mut enforced: Enforced) -> Enforced {
    let normalized = normalize_annotations(enforced.annotations());
    tracing::debug!(
        callable = %enforced.info(),
        before = enforced.annotations().len(),
        after = normalized.len(),
        "normalized annotations"
    );
    enforced.annotations = normalized;
    enforced
}

/// Keeps every entry that resolves to a plain hint, as that hint.
///
/// Order is preserved. Applying it twice changes nothing.
pub fn normalize_annotations(annotations: &Annotations) -> Annotations {
    annotations
        .iter()
        .filter_map(|(name, annotation)| {
            annotation
                .typehint()
                .map(|hint| (name.clone(), Annotation::Hint(hint.clone())))
        })
        .collect()
}
