//! Key comparison strategies.
//!
//! An [`IdentityHashMap`] never calls `Eq` or `Hash` on its keys directly.
//! It asks an [`Equivalence`] strategy instead, which by default is
//! [`ByIdentity`]: two keys are the same only if they are the same object.
//!
//! [`IdentityHashMap`]: crate::IdentityHashMap

use alloc::boxed::Box;
use alloc::rc::Rc;
#[cfg(target_has_atomic = "ptr")]
use alloc::sync::Arc;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ptr::NonNull;

/// Hash reported for the null key (`None` of an `Option` key).
///
/// A fixed, non-zero value keeps the null key's slot stable across runs.
pub const NULL_KEY_HASH: u32 = 0x8000_0002;

const IDENTITY_SEED: u64 = 0x51_7c_c1_b7_27_22_0a_95;

/// Types whose values refer to an object with a stable address.
///
/// Two values with the same [`address`](Identity::address) denote the same
/// object. The address must not change while the value is stored in a map.
pub trait Identity {
    /// The address of the referenced object, or null for the null key.
    fn address(&self) -> *const ();
}

impl<T: ?Sized> Identity for &T {
    #[inline]
    fn address(&self) -> *const () {
        (*self as *const T).cast()
    }
}

impl<T: ?Sized> Identity for &mut T {
    #[inline]
    fn address(&self) -> *const () {
        (&**self as *const T).cast()
    }
}

impl<T: ?Sized> Identity for Box<T> {
    #[inline]
    fn address(&self) -> *const () {
        (&**self as *const T).cast()
    }
}

impl<T: ?Sized> Identity for Rc<T> {
    #[inline]
    fn address(&self) -> *const () {
        Rc::as_ptr(self).cast()
    }
}

#[cfg(target_has_atomic = "ptr")]
impl<T: ?Sized> Identity for Arc<T> {
    #[inline]
    fn address(&self) -> *const () {
        Arc::as_ptr(self).cast()
    }
}

impl<T: ?Sized> Identity for NonNull<T> {
    #[inline]
    fn address(&self) -> *const () {
        self.as_ptr().cast_const().cast()
    }
}

impl<T: ?Sized> Identity for *const T {
    #[inline]
    fn address(&self) -> *const () {
        self.cast()
    }
}

impl<T: ?Sized> Identity for *mut T {
    #[inline]
    fn address(&self) -> *const () {
        self.cast_const().cast()
    }
}

impl<K: Identity> Identity for Option<K> {
    #[inline]
    fn address(&self) -> *const () {
        match self {
            Some(key) => key.address(),
            None => core::ptr::null(),
        }
    }
}

/// A strategy deciding when two values of `T` denote the same key, and how
/// they hash.
///
/// Implementations must be consistent: `equivalent(a, b)` implies
/// `hash(a) == hash(b)`.
pub trait Equivalence<T: ?Sized> {
    /// Hashes `value`. The map mixes high bits into low bits itself.
    fn hash(&self, value: &T) -> u32;

    /// Returns whether `a` and `b` denote the same key.
    fn equivalent(&self, a: &T, b: &T) -> bool;
}

/// Reference equality: keys match only if they are the same object.
///
/// # Examples
///
/// ```rust
/// use ident_hash::equivalence::ByIdentity;
/// use ident_hash::equivalence::Equivalence;
///
/// let a = String::from("node");
/// let b = String::from("node");
/// assert!(ByIdentity.equivalent(&&a, &&a));
/// assert!(!ByIdentity.equivalent(&&a, &&b));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByIdentity;

impl<T: Identity + ?Sized> Equivalence<T> for ByIdentity {
    #[inline]
    fn hash(&self, value: &T) -> u32 {
        let address = value.address();
        if address.is_null() {
            return NULL_KEY_HASH;
        }
        fold(foldhash::fast::FixedState::with_seed(IDENTITY_SEED).hash_one(address as usize))
    }

    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        core::ptr::eq(a.address(), b.address())
    }
}

/// Ordinary `Eq` + `Hash` equality, for maps that want the same table with
/// value semantics.
///
/// # Examples
///
/// ```rust
/// use ident_hash::IdentityHashMap;
/// use ident_hash::equivalence::ByValue;
///
/// let mut map = IdentityHashMap::with_equivalence(ByValue::new());
/// map.insert(String::from("a"), 1);
/// map.insert(String::from("a"), 2);
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get(&String::from("a")), Some(&2));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ByValue<S = foldhash::fast::FixedState> {
    hash_builder: S,
}

impl ByValue {
    /// Hashes keys with `foldhash`'s fixed-seed hasher.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> ByValue<S> {
    /// Uses `hash_builder` to hash keys.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self { hash_builder }
    }
}

impl<T, S> Equivalence<T> for ByValue<S>
where
    T: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, value: &T) -> u32 {
        fold(self.hash_builder.hash_one(value))
    }

    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

#[inline(always)]
fn fold(hash: u64) -> u32 {
    (hash ^ (hash >> 32)) as u32
}
