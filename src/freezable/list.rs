//! Immutable, shareable sequences.

use std::ops::Deref;
use std::sync::Arc;

use super::{FreezeCapability, freeze};

/// A fixed-length, read-only sequence whose storage is shared between clones.
///
/// The canonical empty list owns no storage at all, so every empty list of a given
/// element type is the same instance as far as [`FrozenList::same_instance`] is
/// concerned. Callers use that to tell "no customisation" apart cheaply.
#[derive(Debug)]
pub struct FrozenList<T> {
    items: Option<Arc<[T]>>,
}

impl<T> FrozenList<T> {
    /// The canonical empty list.
    pub const fn empty() -> Self {
        Self { items: None }
    }

    pub fn len(&self) -> usize {
        self.items.as_deref().map_or(0, <[T]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        self.items.as_deref().unwrap_or(&[])
    }

    /// Identity comparison: `true` when both lists share one backing store, or
    /// both are the canonical empty list.
    pub fn same_instance(&self, other: &Self) -> bool {
        match (&self.items, &other.items) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Clone for FrozenList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T> Default for FrozenList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for FrozenList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: PartialEq> PartialEq for FrozenList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<'a, T> IntoIterator for &'a FrozenList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Sources accepted by [`freeze_list`].
pub trait IntoFrozenList<T> {
    fn into_frozen_list(self) -> FrozenList<T>;
}

impl<T> IntoFrozenList<T> for FrozenList<T> {
    fn into_frozen_list(self) -> FrozenList<T> {
        self
    }
}

impl<T> IntoFrozenList<T> for Vec<T> {
    fn into_frozen_list(self) -> FrozenList<T> {
        if self.is_empty() {
            FrozenList::empty()
        } else {
            FrozenList {
                items: Some(Arc::from(self)),
            }
        }
    }
}

impl<T: Clone> IntoFrozenList<T> for &[T] {
    fn into_frozen_list(self) -> FrozenList<T> {
        self.to_vec().into_frozen_list()
    }
}

impl<T, L: IntoFrozenList<T>> IntoFrozenList<T> for Option<L> {
    fn into_frozen_list(self) -> FrozenList<T> {
        match self {
            Some(list) => list.into_frozen_list(),
            None => FrozenList::empty(),
        }
    }
}

/// Produces a frozen list from `seq`.
///
/// Absent or empty input yields the canonical empty list, and a list that is
/// already frozen is returned untouched so upstream sharing survives.
pub fn freeze_list<T>(seq: impl IntoFrozenList<T>) -> FrozenList<T> {
    seq.into_frozen_list()
}

/// Freezes every element, then the list itself.
pub fn freeze_list_and_elements<T: FreezeCapability>(mut seq: Vec<T>) -> FrozenList<T> {
    for item in &mut seq {
        freeze(item);
    }
    freeze_list(seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freezable::{FreezeState, Freezable};

    #[derive(Debug, Default)]
    struct Marker {
        state: FreezeState,
    }

    impl Freezable for Marker {
        fn is_frozen(&self) -> bool {
            self.state.is_frozen()
        }

        fn freeze_core(&mut self) {
            self.state.set_frozen();
        }
    }

    crate::freezable_capability!(Marker);

    #[test]
    fn test_empty_and_missing_share_canonical_instance() {
        let from_empty = freeze_list(Vec::<String>::new());
        let from_missing = freeze_list(None::<Vec<String>>);

        assert!(from_empty.is_empty());
        assert!(from_empty.same_instance(&from_missing));
        assert!(from_empty.same_instance(&FrozenList::empty()));
    }

    #[test]
    fn test_frozen_input_returned_unchanged() {
        let first = freeze_list(vec![1, 2, 3]);
        let again = freeze_list(first.clone());
        assert!(first.same_instance(&again));
        assert_eq!(&*again, &[1, 2, 3]);
    }

    #[test]
    fn test_mutable_input_is_copied_once() {
        let source = vec!["a", "b"];
        let a = freeze_list(source.as_slice());
        let b = freeze_list(source.as_slice());
        assert_eq!(a, b);
        assert!(!a.same_instance(&b));
    }

    #[test]
    fn test_freeze_list_and_elements_freezes_each() {
        let list = freeze_list_and_elements(vec![Marker::default(), Marker::default()]);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|marker| marker.is_frozen()));
    }

    #[test]
    fn test_freeze_list_and_elements_accepts_plain_values() {
        let list = freeze_list_and_elements(vec![String::from("x")]);
        assert_eq!(list.as_slice(), ["x".to_string()]);
        let empty = freeze_list_and_elements(Vec::<String>::new());
        assert!(empty.same_instance(&FrozenList::empty()));
    }

    #[test]
    fn test_freeze_list_and_elements_freezes_owned_arcs() {
        let shared = Arc::new(Marker::default());
        let list = freeze_list_and_elements(vec![Arc::new(Marker::default()), Arc::clone(&shared)]);

        assert!(list[0].is_frozen());
        assert!(!list[1].is_frozen());
        assert!(!shared.is_frozen());
    }
}
