//! One-way mutable → frozen object discipline.
//!
//! A type implementing [`Freezable`] starts out mutable and exclusively owned by
//! whoever built it. Calling [`Freezable::freeze`] publishes it: from then on every
//! mutator fails with [`FrozenMutationError`], and the value can be wrapped in an
//! [`Arc`] and read from any number of threads without locks.
//!
//! Copying is handled by the separate [`CloneMutable`] capability, which always
//! yields a fresh *mutable* instance. The two meet in [`get_frozen_clone`] and
//! [`clone_for_edit`].

use std::any::type_name;
use std::sync::Arc;

pub mod list;

pub use list::{FrozenList, IntoFrozenList, freeze_list, freeze_list_and_elements};

/// Error returned by a mutator invoked on a frozen instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenMutationError {
    /// Concrete type name of the frozen object.
    pub type_name: &'static str,
}

impl FrozenMutationError {
    pub fn for_type<T: ?Sized>() -> Self {
        Self {
            type_name: type_name::<T>(),
        }
    }
}

impl std::fmt::Display for FrozenMutationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot mutate frozen {}", self.type_name)
    }
}

impl std::error::Error for FrozenMutationError {}

/// An object that can be made immutable exactly once.
pub trait Freezable {
    /// Whether the object has been frozen.
    fn is_frozen(&self) -> bool;

    /// Type-specific finalisation: freeze owned sub-objects and set the flag.
    ///
    /// Only called by [`Freezable::freeze`] while the object is still mutable.
    fn freeze_core(&mut self);

    /// Freezes the object. Calling this on a frozen object does nothing.
    fn freeze(&mut self) {
        if !self.is_frozen() {
            self.freeze_core();
        }
    }
}

/// Produces an independent, mutable copy of a value.
///
/// Unlike [`Clone`], the copy never inherits the frozen state of the source.
pub trait CloneMutable {
    fn clone_mutable(&self) -> Self;
}

/// Optional access to the [`Freezable`] capability.
///
/// Collection helpers accept any element type implementing this, whether or not
/// the element itself can be frozen.
pub trait FreezeCapability {
    fn as_freezable(&mut self) -> Option<&mut dyn Freezable> {
        None
    }
}

impl<T: FreezeCapability + ?Sized> FreezeCapability for Box<T> {
    fn as_freezable(&mut self) -> Option<&mut dyn Freezable> {
        (**self).as_freezable()
    }
}

impl<T: FreezeCapability> FreezeCapability for Option<T> {
    fn as_freezable(&mut self) -> Option<&mut dyn Freezable> {
        self.as_mut().and_then(|item| item.as_freezable())
    }
}

/// A uniquely owned `Arc` is frozen in place. A shared one cannot be reached
/// mutably and is left as is; [`get_frozen_clone`] gives a frozen copy instead.
impl<T: Freezable> FreezeCapability for Arc<T> {
    fn as_freezable(&mut self) -> Option<&mut dyn Freezable> {
        let Some(item) = Arc::get_mut(self) else {
            log::trace!("Skipping freeze of shared {}", type_name::<T>());
            return None;
        };
        Some(item as &mut dyn Freezable)
    }
}

macro_rules! impl_not_freezable {
    ($($ty:ty),* $(,)?) => {
        $(impl FreezeCapability for $ty {})*
    };
}

impl_not_freezable!(
    String, &'static str, bool, char, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32,
    f64,
);

/// Implements [`FreezeCapability`] for a [`Freezable`] type by exposing itself.
#[macro_export]
macro_rules! freezable_capability {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::freezable::FreezeCapability for $ty {
                fn as_freezable(&mut self) -> Option<&mut dyn $crate::freezable::Freezable> {
                    Some(self)
                }
            }
        )*
    };
}

/// One-way frozen flag for embedding in concrete types.
///
/// Cloning a `FreezeState` always yields a mutable state, so a derived [`Clone`]
/// on the owner produces an unfrozen copy. The flag never takes part in value
/// equality.
#[derive(Debug, Default)]
pub struct FreezeState {
    frozen: bool,
}

impl FreezeState {
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn set_frozen(&mut self) {
        self.frozen = true;
    }
}

impl Clone for FreezeState {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl PartialEq for FreezeState {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for FreezeState {}

/// Guard called first by every mutator.
#[inline]
pub fn check_mutable<T: Freezable + ?Sized>(obj: &T) -> Result<(), FrozenMutationError> {
    if obj.is_frozen() {
        Err(FrozenMutationError::for_type::<T>())
    } else {
        Ok(())
    }
}

/// Freezes `item` if it exposes the [`Freezable`] capability.
pub fn freeze(item: &mut dyn FreezeCapability) {
    if let Some(freezable) = item.as_freezable() {
        freezable.freeze();
    }
}

/// Freezes `item` and hands it back, for fluent construction.
pub fn freeze_and_return<T: Freezable>(mut item: T) -> T {
    item.freeze();
    item
}

/// Returns a frozen version of `item`.
///
/// A frozen input is shared as-is. A mutable input is cloned and the clone is
/// frozen; the original stays mutable and unchanged.
pub fn get_frozen_clone<T: Freezable + CloneMutable>(item: &Arc<T>) -> Arc<T> {
    if item.is_frozen() {
        Arc::clone(item)
    } else {
        Arc::new(freeze_and_return(item.clone_mutable()))
    }
}

/// Copy-on-write entry point: a mutable copy of a (usually shared, frozen) value.
pub fn clone_for_edit<T: CloneMutable>(item: &T) -> T {
    item.clone_mutable()
}
