//! The implicit forest of Leonardo max-heaps and its repair primitives.
//!
//! The forest lives directly inside the prefix of the sequence being
//! sorted. Its only state beyond the sequence is [`Forest`]: a boundary,
//! the shape register, and the size pair of the rightmost tree. Child and
//! neighbor positions are derived arithmetically from a root index and a
//! [`LeonardoPair`]; no tree node is ever materialized.
//!
//! Invariants after every completed [`Forest::grow`]/[`Forest::collapse`]:
//! the trees partition the absorbed prefix, their orders strictly decrease
//! left to right, every tree is a max-heap, and tree roots read left to
//! right are non-decreasing (so the rightmost root is the prefix maximum).
//! Mid-call the invariants are transiently broken; the `assert!`s here are
//! the fail-fast guards for states the bookkeeping must never reach.

use std::cmp::Ordering;
use std::mem::ManuallyDrop;
use std::ptr;

use crate::leonardo::{LeonardoPair, ShapeRegister};
use crate::observer::{BufferId, Observer};

const SEQ: BufferId = BufferId::SEQUENCE;

/// An element lifted out of the sequence during heap repair.
///
/// The slot at `index` holds a stale bit-copy until the hole is dropped;
/// dropping writes the held value back into whatever slot the hole has
/// walked to. That makes a panicking comparator or observer leave the
/// sequence a permutation of the input instead of double-dropping a value.
struct Hole<T> {
    value: ManuallyDrop<T>,
    dst: *mut T,
    index: usize,
}

impl<T> Hole<T> {
    /// Lift the element at `index` out of `v`.
    fn lift<O: Observer>(v: &mut [T], index: usize, obs: &mut O) -> Self {
        assert!(index < v.len());
        obs.on_read(SEQ, index);
        // SAFETY: `index` is in bounds; the duplicate left in the slice is
        // never read through the slice and is overwritten on drop.
        unsafe {
            let dst = v.as_mut_ptr().add(index);
            Self {
                value: ManuallyDrop::new(ptr::read(dst)),
                dst,
                index,
            }
        }
    }

    #[inline]
    fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn value(&self) -> &T {
        &self.value
    }

    /// Move `v[src]` into the hole slot; the hole becomes `src`.
    fn shift_to<O: Observer>(&mut self, v: &mut [T], src: usize, obs: &mut O) {
        assert!(src < v.len() && src != self.index);
        obs.on_read(SEQ, src);
        obs.on_write(SEQ, self.index);
        // SAFETY: `src` is in bounds and distinct from the hole slot.
        unsafe {
            let src = v.as_mut_ptr().add(src);
            ptr::copy_nonoverlapping(src, self.dst, 1);
            self.dst = src;
        }
        self.index = src;
    }

    /// Report the final write and settle the held value (via `Drop`).
    fn commit<O: Observer>(self, obs: &mut O) {
        obs.on_write(SEQ, self.index);
    }
}

impl<T> Drop for Hole<T> {
    fn drop(&mut self) {
        // SAFETY: `dst` is the hole slot, valid for one write; `value` is
        // taken exactly once here.
        unsafe {
            ptr::copy_nonoverlapping(&*self.value, self.dst, 1);
        }
    }
}

/// Does `v[index]` compare greater than the lifted value?
#[inline]
fn exceeds_hole<T, F, O>(v: &[T], index: usize, hole: &Hole<T>, compare: &mut F, obs: &mut O) -> bool
where
    F: FnMut(&T, &T) -> Ordering,
    O: Observer,
{
    obs.on_compare(SEQ, index, hole.index());
    compare(&v[index], hole.value()) == Ordering::Greater
}

/// Settle a lifted value into the tree rooted at the hole's position.
///
/// Precondition: the (up to two) child subtrees are already valid
/// max-heaps. The hole walks down toward the larger-rooted child until the
/// held value dominates, copying child roots up as it goes. O(order).
fn sift<T, F, O>(v: &mut [T], mut pair: LeonardoPair, mut hole: Hole<T>, compare: &mut F, obs: &mut O)
where
    F: FnMut(&T, &T) -> Ordering,
    O: Observer,
{
    while pair.has_children() {
        let right = hole.index() - 1;
        let left = right - pair.right_len();

        obs.on_compare(SEQ, left, right);
        let (child, child_pair) = if compare(&v[left], &v[right]) == Ordering::Less {
            (right, pair.descend().descend())
        } else {
            (left, pair.descend())
        };

        if !exceeds_hole(v, child, &hole, compare, obs) {
            break;
        }
        hole.shift_to(v, child, obs);
        pair = child_pair;
    }
    hole.commit(obs);
}

/// Carry the value at `root` leftward across tree roots while the
/// preceding root exceeds it, then sift it into the tree it landed in.
///
/// The predecessor's order is read from the shape register, not derived
/// arithmetically: adjacent trees may differ by more than one order.
fn trinkle<T, F, O>(
    v: &mut [T],
    shape: ShapeRegister,
    mut pair: LeonardoPair,
    root: usize,
    compare: &mut F,
    obs: &mut O,
) where
    F: FnMut(&T, &T) -> Ordering,
    O: Observer,
{
    let mut hole = Hole::lift(v, root, obs);
    while let Some(above) = shape.next_above(pair.order()) {
        let pred = hole.index() - pair.len();
        if !exceeds_hole(v, pred, &hole, compare, obs) {
            break;
        }
        // The predecessor root may only be deposited here if it also
        // dominates the current tree's children; otherwise that tree's
        // own larger child belongs at this root and the plain sift below
        // takes over. Skipping this check plants a too-small root in a
        // tree the final sift never revisits.
        if pair.has_children() {
            let right = hole.index() - 1;
            let left = right - pair.right_len();
            obs.on_compare(SEQ, left, right);
            let child = if compare(&v[left], &v[right]) == Ordering::Less {
                right
            } else {
                left
            };
            obs.on_compare(SEQ, child, pred);
            if compare(&v[child], &v[pred]) != Ordering::Less {
                break;
            }
        }
        hole.shift_to(v, pred, obs);
        pair = pair.ascend_to(above);
    }
    sift(v, pair, hole, compare, obs);
}

/// One comparison against the immediate left neighbor root, escalating to
/// a full [`trinkle`] at the neighbor only when the swap fired.
fn semi_trinkle<T, F, O>(
    v: &mut [T],
    shape: ShapeRegister,
    pair: LeonardoPair,
    root: usize,
    compare: &mut F,
    obs: &mut O,
) where
    F: FnMut(&T, &T) -> Ordering,
    O: Observer,
{
    let Some(above) = shape.next_above(pair.order()) else {
        return;
    };
    let pred = root - pair.len();
    obs.on_compare(SEQ, pred, root);
    if compare(&v[pred], &v[root]) == Ordering::Greater {
        obs.on_swap(SEQ, pred, root);
        v.swap(pred, root);
        // The smaller value now sits at the neighbor's root and may
        // violate both root order and that tree's own heap property.
        trinkle(v, shape, pair.ascend_to(above), pred, compare, obs);
    }
}

/// The O(1) forest descriptor: how much of the sequence the forest owns
/// and which Leonardo trees cover it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Forest {
    /// Number of sequence elements owned by the forest; the rightmost
    /// tree's root sits at `absorbed - 1`.
    absorbed: usize,
    shape: ShapeRegister,
    /// Size pair of the rightmost (lowest-order) tree. Placeholder while
    /// the forest is empty.
    rightmost: LeonardoPair,
}

impl Forest {
    pub(crate) fn new() -> Self {
        Self {
            absorbed: 0,
            shape: ShapeRegister::EMPTY,
            rightmost: LeonardoPair::ORDER_1,
        }
    }

    pub(crate) fn absorbed(&self) -> usize {
        self.absorbed
    }

    pub(crate) fn is_drained(&self) -> bool {
        self.shape.is_empty()
    }

    /// Absorb the raw element at the current boundary into the forest.
    pub(crate) fn grow<T, F, O>(&mut self, v: &mut [T], compare: &mut F, obs: &mut O)
    where
        F: FnMut(&T, &T) -> Ordering,
        O: Observer,
    {
        let root = self.absorbed;
        debug_assert!(root < v.len());

        if self.shape.fuse_ready() {
            // Skew-binary carry: the two rightmost trees become the
            // children of one tree two orders up, with the new element as
            // the root candidate. The children are valid heaps already, so
            // one sift settles it.
            let low = self.rightmost.order();
            debug_assert_eq!(self.shape.lowest(), Some(low));
            self.shape = self.shape.remove(low).remove(low + 1).insert(low + 2);
            self.rightmost = self.rightmost.ascend().ascend();
            let hole = Hole::lift(v, root, obs);
            sift(v, self.rightmost, hole, compare, obs);
        } else {
            // Append a singleton: order 0 beside an order-1 tree, order 1
            // otherwise.
            self.rightmost = match self.shape.lowest() {
                Some(1) => LeonardoPair::ORDER_0,
                Some(0) => panic!("order-0 tree without an order-1 neighbor during build"),
                _ => LeonardoPair::ORDER_1,
            };
            self.shape = self.shape.insert(self.rightmost.order());
        }

        self.absorbed += 1;
        // Restore root order against the trees to the left.
        trinkle(v, self.shape, self.rightmost, root, compare, obs);
    }

    /// Freeze the forest maximum in place at the boundary and shrink.
    pub(crate) fn collapse<T, F, O>(&mut self, v: &mut [T], compare: &mut F, obs: &mut O)
    where
        F: FnMut(&T, &T) -> Ordering,
        O: Observer,
    {
        assert!(!self.shape.is_empty(), "collapse on an empty forest");
        let pair = self.rightmost;
        assert_eq!(
            self.shape.lowest(),
            Some(pair.order()),
            "shape register out of sync with the rightmost tree"
        );

        let root = self.absorbed - 1;
        self.shape = self.shape.remove(pair.order());

        if !pair.has_children() {
            // Leaf tree: the frozen maximum is already in place and no
            // other value moves.
            if let Some(low) = self.shape.lowest() {
                self.rightmost = pair.ascend_to(low);
            }
        } else {
            // Split into the two child trees; both are valid heaps, so no
            // sift is needed. Repair root order at the exposed boundaries,
            // left child first: the right child's predecessor is the left
            // child, so this order never revisits a settled boundary.
            let left = pair.descend();
            let right = left.descend();
            let right_root = root - 1;
            let left_root = right_root - right.len();
            self.shape = self.shape.insert(left.order()).insert(right.order());

            semi_trinkle(v, self.shape, left, left_root, compare, obs);
            semi_trinkle(v, self.shape, right, right_root, compare, obs);
            self.rightmost = right;
        }

        self.absorbed -= 1;
    }
}
