//! Instrumentation boundary for trace/replay consumers.
//!
//! The sort reports every semantically meaningful access to the sequence
//! through an [`Observer`]: element reads and writes, pairwise
//! comparisons and swaps. Events are emitted synchronously, one per
//! underlying operation, never batched or elided, so an external consumer
//! can reconstruct and replay the full operation trace.
//!
//! Callbacks must not mutate the sequence or reenter the sort. A panic in
//! a callback propagates to the caller; the sequence is then an
//! unspecified permutation of the input and must be discarded or
//! re-sorted.

/// Identifies the logical buffer an event refers to, for consumers that
/// trace multi-buffer algorithms. This in-place sort only ever touches
/// [`BufferId::SEQUENCE`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct BufferId(pub u16);

impl BufferId {
    /// The caller's sequence.
    pub const SEQUENCE: Self = Self(0);
}

/// Callbacks invoked at every sequence access the sort performs.
///
/// All methods default to no-ops; implement only what the consumer needs.
/// While a value is lifted out of the array during heap repair, events
/// that involve it are attributed to the slot it logically occupies (the
/// current hole position).
pub trait Observer {
    /// The element at `index` was read.
    fn on_read(&mut self, buf: BufferId, index: usize) {
        let _ = (buf, index);
    }

    /// The element at `index` was overwritten.
    fn on_write(&mut self, buf: BufferId, index: usize) {
        let _ = (buf, index);
    }

    /// The elements at `a` and `b` were compared.
    fn on_compare(&mut self, buf: BufferId, a: usize, b: usize) {
        let _ = (buf, a, b);
    }

    /// The elements at `a` and `b` were exchanged.
    fn on_swap(&mut self, buf: BufferId, a: usize, b: usize) {
        let _ = (buf, a, b);
    }

    /// `len` elements were block-copied from `src` to `dst`.
    ///
    /// Part of the shared trace vocabulary; smoothsort itself performs no
    /// block moves and never emits this event.
    fn on_copy_range(&mut self, buf: BufferId, src: usize, dst: usize, len: usize) {
        let _ = (buf, src, dst, len);
    }
}

/// The default observer: every event is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn on_read(&mut self, buf: BufferId, index: usize) {
        (**self).on_read(buf, index);
    }

    fn on_write(&mut self, buf: BufferId, index: usize) {
        (**self).on_write(buf, index);
    }

    fn on_compare(&mut self, buf: BufferId, a: usize, b: usize) {
        (**self).on_compare(buf, a, b);
    }

    fn on_swap(&mut self, buf: BufferId, a: usize, b: usize) {
        (**self).on_swap(buf, a, b);
    }

    fn on_copy_range(&mut self, buf: BufferId, src: usize, dst: usize, len: usize) {
        (**self).on_copy_range(buf, src, dst, len);
    }
}
