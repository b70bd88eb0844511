//! Rayon parallel iterator implementations for `IdentityHashMap`.

use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator;
use rayon::iter::plumbing::Folder;
use rayon::iter::plumbing::UnindexedConsumer;
use rayon::iter::plumbing::UnindexedProducer;
use rayon::iter::plumbing::bridge_unindexed;

use crate::IdentityHashMap;
use crate::views::Split;
use crate::views::split_of;

/// Implementation of `IntoParallelIterator` for `&IdentityHashMap`.
impl<'map, K, V, E> IntoParallelIterator for &'map IdentityHashMap<K, V, E>
where
    K: Sync,
    V: Sync,
{
    type Iter = ParIter<'map, K, V>;
    type Item = (&'map K, &'map V);

    fn into_par_iter(self) -> Self::Iter {
        ParIter {
            split: split_of(self),
        }
    }
}

impl<K, V, E> IdentityHashMap<K, V, E>
where
    K: Sync,
    V: Sync,
{
    /// Returns a parallel iterator over the entries.
    ///
    /// Available with the `rayon` feature.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    /// use rayon::iter::ParallelIterator;
    ///
    /// let keys: Vec<u64> = (0..1000).collect();
    /// let map: IdentityHashMap<&u64, u64> = keys.iter().map(|k| (k, *k)).collect();
    /// assert_eq!(map.par_iter().map(|(_, v)| *v).sum::<u64>(), 499_500);
    /// ```
    pub fn par_iter(&self) -> ParIter<'_, K, V> {
        self.into_par_iter()
    }
}

/// Parallel iterator over the entries of an [`IdentityHashMap`].
///
/// This struct is created by [`IdentityHashMap::par_iter`] or by calling
/// `into_par_iter()` on a `&IdentityHashMap`. Work is divided by splitting the
/// slot range in half until rayon stops asking.
pub struct ParIter<'map, K, V> {
    split: Split<'map, K, V>,
}

impl<K, V> core::fmt::Debug for ParIter<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParIter")
            .field("estimate", &self.split.estimate())
            .finish()
    }
}

impl<'map, K, V> ParallelIterator for ParIter<'map, K, V>
where
    K: Sync + 'map,
    V: Sync + 'map,
{
    type Item = (&'map K, &'map V);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge_unindexed(SplitProducer(self.split), consumer)
    }
}

struct SplitProducer<'map, K, V>(Split<'map, K, V>);

impl<'map, K, V> UnindexedProducer for SplitProducer<'map, K, V>
where
    K: Sync + 'map,
    V: Sync + 'map,
{
    type Item = (&'map K, &'map V);

    fn split(mut self) -> (Self, Option<Self>) {
        let front = self.0.split().map(SplitProducer);
        match front {
            Some(front) => (front, Some(self)),
            None => (self, None),
        }
    }

    fn fold_with<F>(self, folder: F) -> F
    where
        F: Folder<Self::Item>,
    {
        folder.consume_iter(self.0)
    }
}
