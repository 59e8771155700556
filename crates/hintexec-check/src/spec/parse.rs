//! Forgiving parser for specification payloads.
//!
//! A payload is the list of items given to `Assert`, `Modify` or `Sequence`
//! at declaration time. The parser never fails: items it cannot use are
//! dropped, and a payload with nothing usable becomes a no-op.

use hintexec_core::TypeHint;

use super::SpecItem;

/// Parsed payload: the optional leading type hint and the pipeline steps.
///
/// The steps are `None`, never an empty vector, when nothing usable was found.
pub type Parsed<T> = (Option<TypeHint>, Option<Vec<T>>);

/// Splits a payload into its type hint and the steps `pick` accepts.
///
/// - no items: `(None, None)`
/// - a single type hint: `(Some(hint), None)`
/// - a single usable step: `(None, Some([step]))`
/// - several items: a leading type hint is consumed, then every usable step
///   is kept in order; type hints and unusable items after the first
///   position are dropped
/// - anything else: `(None, None)`
pub fn parse<T>(items: Vec<SpecItem>, pick: impl Fn(SpecItem) -> Option<T>) -> Parsed<T> {
    if items.len() == 1 {
        return match items.into_iter().next() {
            Some(SpecItem::Hint(hint)) => (Some(hint), None),
            Some(item) => match pick(item) {
                Some(step) => (None, Some(vec![step])),
                None => (None, None),
            },
            None => (None, None),
        };
    }
    if items.is_empty() {
        return (None, None);
    }

    let mut items = items.into_iter().peekable();
    let typehint = match items.next_if(SpecItem::is_type_hint) {
        Some(SpecItem::Hint(hint)) => Some(hint),
        _ => None,
    };
    let steps: Vec<T> = items
        .filter(|item| !item.is_type_hint())
        .filter_map(pick)
        .collect();

    (typehint, (!steps.is_empty()).then_some(steps))
}
