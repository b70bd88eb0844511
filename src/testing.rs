use crate::equivalence::Equivalence;

/// A key that reports a chosen hash, so tests can steer entries into
/// particular slots. For hashes below `1 << 16` the preferred slot is
/// `hash & (capacity - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Pinned {
    pub(crate) hash: u32,
    pub(crate) id: u32,
}

pub(crate) const fn pinned(hash: u32, id: u32) -> Pinned {
    Pinned { hash, id }
}

/// Hashes [`Pinned`] keys by their chosen hash and compares them by id.
/// Values compare with `==`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PinnedHash;

impl Equivalence<Pinned> for PinnedHash {
    fn hash(&self, value: &Pinned) -> u32 {
        value.hash
    }

    fn equivalent(&self, a: &Pinned, b: &Pinned) -> bool {
        a.id == b.id
    }
}

impl Equivalence<u32> for PinnedHash {
    fn hash(&self, value: &u32) -> u32 {
        *value
    }

    fn equivalent(&self, a: &u32, b: &u32) -> bool {
        a == b
    }
}
