//! An in-place, adaptive, comparison-based sort with O(1) auxiliary space.
//!
//! This is smoothsort: an implicit forest of Leonardo max-heaps laid out
//! directly inside the slice, tracked with a handful of scalar counters.
//! The build phase absorbs one element at a time into the forest; the
//! extraction phase repeatedly freezes the current maximum at the
//! shrinking right boundary. Already-sorted input costs O(n); the worst
//! case is O(n log n). The sort is not stable and never allocates.
//!
//! Every read, write, comparison, and swap of the slice can be reported to
//! an [`Observer`] for trace recording and replay; [`sort`] and
//! [`sort_by`] use the no-op observer.
//!
//! A comparator that is not a strict weak order yields an unspecified
//! permutation of the input, but the sort still terminates without
//! reading out of bounds: the number of grow/collapse steps and the loop
//! bounds inside them are fixed by the forest arithmetic, not by
//! comparison outcomes. A panic in the comparator or observer propagates;
//! the slice is then an unspecified permutation and should be discarded
//! or re-sorted.

mod forest;
pub mod leonardo;
mod observer;

use std::cmp::Ordering;

use forest::Forest;
pub use leonardo::{LeonardoPair, ShapeRegister};
pub use observer::{BufferId, NoopObserver, Observer};

/// Sorts the slice in place into non-decreasing order. Not stable.
#[inline]
pub fn sort<T: Ord>(v: &mut [T]) {
    sort_by_observed(v, T::cmp, &mut NoopObserver);
}

/// Sorts the slice in place with a comparator function. Not stable.
#[inline]
pub fn sort_by<T, F>(v: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_by_observed(v, compare, &mut NoopObserver);
}

/// Sorts the slice in place, reporting every sequence access to
/// `observer`.
pub fn sort_by_observed<T, F, O>(v: &mut [T], mut compare: F, observer: &mut O)
where
    F: FnMut(&T, &T) -> Ordering,
    O: Observer,
{
    let n = v.len();
    if n < 2 {
        return;
    }

    let mut forest = Forest::new();
    for _ in 0..n {
        forest.grow(v, &mut compare, observer);
    }
    for _ in 0..n {
        forest.collapse(v, &mut compare, observer);
    }
    debug_assert!(forest.is_drained());
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::panic::{self, AssertUnwindSafe};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[derive(Default)]
    struct CountingObserver {
        reads: usize,
        writes: usize,
        compares: usize,
        swaps: usize,
    }

    impl CountingObserver {
        /// Element writes performed, counting a swap as two.
        fn write_cost(&self) -> usize {
            self.writes + 2 * self.swaps
        }
    }

    impl Observer for CountingObserver {
        fn on_read(&mut self, _buf: BufferId, _index: usize) {
            self.reads += 1;
        }

        fn on_write(&mut self, _buf: BufferId, _index: usize) {
            self.writes += 1;
        }

        fn on_compare(&mut self, _buf: BufferId, _a: usize, _b: usize) {
            self.compares += 1;
        }

        fn on_swap(&mut self, _buf: BufferId, _a: usize, _b: usize) {
            self.swaps += 1;
        }
    }

    fn assert_sorts_like_std(data: &[u64]) {
        let mut actual = data.to_vec();
        sort(&mut actual);

        let mut expected = data.to_vec();
        expected.sort_unstable();

        assert_eq!(actual, expected, "input_len={}", data.len());
    }

    fn write_cost_of(data: &[i64]) -> usize {
        let mut v = data.to_vec();
        let mut counter = CountingObserver::default();
        sort_by_observed(&mut v, i64::cmp, &mut counter);
        assert!(v.is_sorted());
        counter.write_cost()
    }

    #[test]
    fn edge_cases() {
        let cases: [&[u64]; 9] = [
            &[],
            &[5],
            &[3, 1, 2],
            &[1, 2, 3, 4, 5],
            &[5, 4, 3, 2, 1],
            &[4, 2, 4, 2, 4],
            &[7; 128],
            &[u64::MIN, 1, u64::MAX, 0, u64::MAX - 1, 2],
            &[5, 5, 3, 3, 1, 1, 4, 4, 2, 2, 0, 0],
        ];

        for case in cases {
            assert_sorts_like_std(case);
        }
    }

    #[test]
    fn minimum_after_sorted_prefix() {
        // The tail element is carried left across several heap roots on
        // absorption; the carry must stop at a tree whose children exceed
        // the root before it. n = 19 is the smallest length where a carry
        // past such a tree is possible.
        for n in [19u64, 20, 34, 48, 67, 200] {
            let mut data: Vec<u64> = (1..n).collect();
            data.push(0);
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn fixed_seed_random_cases() {
        let mut rng = StdRng::seed_from_u64(0x5300_2026);
        for size in [2usize, 3, 8, 31, 32, 63, 64, 127, 128, 511, 2048] {
            let data: Vec<u64> = (0..size).map(|_| rng.random()).collect();
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn fixed_seed_many_duplicates() {
        let mut rng = StdRng::seed_from_u64(0xD0D0_2026);
        for size in [64usize, 1024, 4096] {
            let data: Vec<u64> = (0..size).map(|_| (rng.random::<u64>() % 16) * 17).collect();
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn sort_by_respects_comparator() {
        let mut v = vec![3i32, 1, 4, 1, 5, 9, 2, 6];
        sort_by(&mut v, |a, b| b.cmp(a));
        assert_eq!(v, [9, 6, 5, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn sorted_input_is_linear_in_writes() {
        for n in [5usize, 1000] {
            let sorted: Vec<i64> = (0..n as i64).collect();
            let reversed: Vec<i64> = (0..n as i64).rev().collect();

            let sorted_cost = write_cost_of(&sorted);
            let reversed_cost = write_cost_of(&reversed);

            assert!(
                sorted_cost <= 4 * n,
                "n={n}: sorted input cost {sorted_cost} writes"
            );
            assert!(
                sorted_cost < reversed_cost,
                "n={n}: sorted {sorted_cost} vs reversed {reversed_cost}"
            );
        }
    }

    #[test]
    fn idempotent_on_sorted_input() {
        let mut v: Vec<u64> = (0..512).collect();
        let expected = v.clone();
        sort(&mut v);
        assert_eq!(v, expected);
        sort(&mut v);
        assert_eq!(v, expected);
    }

    #[test]
    fn equal_keys_sort_by_key_only() {
        // Tagged equal elements: only key order is asserted. The relative
        // order of equal keys is deliberately left unchecked; this sort
        // makes no stability promise.
        let mut v: Vec<(u8, usize)> = [4u8, 2, 4, 2, 4, 2, 4, 1, 1, 3]
            .iter()
            .enumerate()
            .map(|(id, &key)| (key, id))
            .collect();
        let mut expected_tags: Vec<(u8, usize)> = v.clone();
        expected_tags.sort_unstable();

        sort_by(&mut v, |a, b| a.0.cmp(&b.0));

        assert!(v.iter().map(|e| e.0).is_sorted());
        let mut actual_tags = v.clone();
        actual_tags.sort_unstable();
        assert_eq!(actual_tags, expected_tags, "output must be a permutation");
    }

    #[test]
    fn observer_sees_in_bounds_indices_only() {
        struct BoundsObserver {
            len: usize,
            events: usize,
        }

        impl Observer for BoundsObserver {
            fn on_read(&mut self, buf: BufferId, index: usize) {
                assert_eq!(buf, BufferId::SEQUENCE);
                assert!(index < self.len);
                self.events += 1;
            }

            fn on_write(&mut self, buf: BufferId, index: usize) {
                assert_eq!(buf, BufferId::SEQUENCE);
                assert!(index < self.len);
                self.events += 1;
            }

            fn on_compare(&mut self, buf: BufferId, a: usize, b: usize) {
                assert_eq!(buf, BufferId::SEQUENCE);
                assert!(a < self.len && b < self.len);
                assert_ne!(a, b);
                self.events += 1;
            }

            fn on_swap(&mut self, buf: BufferId, a: usize, b: usize) {
                assert_eq!(buf, BufferId::SEQUENCE);
                assert!(a < self.len && b < self.len);
                assert_ne!(a, b);
                self.events += 1;
            }

            fn on_copy_range(&mut self, _buf: BufferId, _src: usize, _dst: usize, _len: usize) {
                panic!("smoothsort performs no block moves");
            }
        }

        let mut rng = StdRng::seed_from_u64(0x0B5E_2026);
        let mut v: Vec<u32> = (0..200).map(|_| rng.random()).collect();
        let mut obs = BoundsObserver {
            len: v.len(),
            events: 0,
        };
        sort_by_observed(&mut v, u32::cmp, &mut obs);
        assert!(v.is_sorted());
        assert!(obs.events > 0);
    }

    #[test]
    fn comparator_without_total_order_still_terminates() {
        // An inconsistent comparator: sortedness of the result is
        // unspecified, but the call must return and keep every element.
        let mut v: Vec<u32> = (0..300).collect();
        let mut flip = false;
        sort_by(&mut v, |a, b| {
            flip = !flip;
            if flip { a.cmp(b) } else { b.cmp(a) }
        });

        let mut recovered = v.clone();
        recovered.sort_unstable();
        let expected: Vec<u32> = (0..300).collect();
        assert_eq!(recovered, expected);
    }

    #[test]
    fn panicking_observer_leaves_a_permutation() {
        struct PanicAfter(usize);

        impl Observer for PanicAfter {
            fn on_write(&mut self, _buf: BufferId, _index: usize) {
                if self.0 == 0 {
                    panic!("observer bailed");
                }
                self.0 -= 1;
            }
        }

        let original: Vec<String> = (0..40).rev().map(|i| format!("item-{i:03}")).collect();
        let mut v = original.clone();
        let mut obs = PanicAfter(25);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            sort_by_observed(&mut v, |a, b| a.cmp(b), &mut obs);
        }));
        assert!(result.is_err());

        // Contents are unspecified after the panic, but every element must
        // still be present exactly once.
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for s in &v {
            *counts.entry(s.as_str()).or_default() += 1;
        }
        for s in &original {
            assert_eq!(counts.get(s.as_str()), Some(&1), "lost or duplicated {s}");
        }
    }

    #[test]
    fn zero_sized_elements() {
        let mut v = vec![(); 17];
        sort(&mut v);
        assert_eq!(v.len(), 17);
    }
}
