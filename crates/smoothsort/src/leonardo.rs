//! Leonardo number arithmetic and the forest shape register.
//!
//! Leonardo numbers follow L(0) = L(1) = 1, L(k) = L(k-1) + L(k-2) + 1 and
//! are the sizes of the implicit heaps the sort maintains. Nothing here
//! touches the sequence being sorted; these are the pure integer
//! transformations everything else is built on.

/// The size pair of a Leonardo tree: its order `k` together with
/// `(L(k), L(k-1))`.
///
/// Dijkstra's formulation keeps only the two sizes and lets the lower one
/// go to -1 at order 0. Carrying the order keeps the arithmetic unsigned
/// and gives the consistency checks against [`ShapeRegister`] something to
/// compare. At order 0 the `prev` field is padding and held at 1.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LeonardoPair {
    order: u32,
    len: usize,
    prev: usize,
}

impl LeonardoPair {
    /// The order-0 singleton tree.
    pub const ORDER_0: Self = Self {
        order: 0,
        len: 1,
        prev: 1,
    };

    /// The order-1 singleton tree.
    pub const ORDER_1: Self = Self {
        order: 1,
        len: 1,
        prev: 1,
    };

    #[inline]
    pub fn order(self) -> u32 {
        self.order
    }

    /// L(order): the number of elements in a tree of this order.
    #[inline]
    pub fn len(self) -> usize {
        self.len
    }

    /// L(order - 1): the size of the left child subtree. Meaningless at
    /// order 0.
    #[inline]
    pub fn left_len(self) -> usize {
        debug_assert!(self.order >= 1);
        self.prev
    }

    /// L(order - 2): the size of the right child subtree. Only defined for
    /// orders with children.
    #[inline]
    pub fn right_len(self) -> usize {
        debug_assert!(self.order >= 2);
        self.len - self.prev - 1
    }

    /// True if a tree of this order has child subtrees.
    #[inline]
    pub fn has_children(self) -> bool {
        self.order >= 2
    }

    /// Move one order up: `(L(k), L(k-1)) -> (L(k+1), L(k))`.
    #[inline]
    pub fn ascend(self) -> Self {
        match self.order {
            0 => Self::ORDER_1,
            _ => Self {
                order: self.order + 1,
                len: self.len + self.prev + 1,
                prev: self.len,
            },
        }
    }

    /// Move one order down: the exact inverse of [`ascend`](Self::ascend).
    ///
    /// Panics at order 0; order -1 does not exist and a caller asking for
    /// it has broken its own bookkeeping.
    #[inline]
    pub fn descend(self) -> Self {
        assert!(self.order >= 1, "descend below Leonardo order 0");
        match self.order {
            1 => Self::ORDER_0,
            _ => Self {
                order: self.order - 1,
                len: self.prev,
                prev: self.len - self.prev - 1,
            },
        }
    }

    /// Ascend until `order` is reached. `order` must not be below the
    /// current order.
    #[inline]
    pub fn ascend_to(mut self, order: u32) -> Self {
        debug_assert!(order >= self.order);
        while self.order < order {
            self = self.ascend();
        }
        self
    }
}

/// Which Leonardo orders are present in the forest, as a bitmask:
/// bit `k` is set iff a tree of order `k` exists.
///
/// This evolves like a skew-binary counter as the forest grows and
/// shrinks. Orders are pairwise distinct (the "two trees of equal size"
/// case allowed by the forest shape is orders 1 and 0, which both have
/// size 1). 128 bits are enough for any addressable sequence: L(k)
/// overflows 64-bit sizes well before k reaches 128.
///
/// `insert` and `remove` assert the bit transition is possible. Those
/// asserts are the reimplementation of the reference's "shape register
/// must never hold an impossible value" runtime check: if one fires, the
/// defect is in this crate's order arithmetic and the check must not be
/// loosened.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShapeRegister(u128);

impl ShapeRegister {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, order: u32) -> bool {
        debug_assert!(order < 128);
        self.0 & (1u128 << order) != 0
    }

    #[inline]
    pub fn insert(self, order: u32) -> Self {
        assert!(!self.contains(order), "duplicate Leonardo order {order}");
        Self(self.0 | (1u128 << order))
    }

    #[inline]
    pub fn remove(self, order: u32) -> Self {
        assert!(self.contains(order), "missing Leonardo order {order}");
        Self(self.0 & !(1u128 << order))
    }

    /// The order of the rightmost (smallest) tree, if any.
    #[inline]
    pub fn lowest(self) -> Option<u32> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros())
        }
    }

    /// The order of the tree immediately left of a tree of order `order`,
    /// i.e. the smallest present order strictly above it.
    #[inline]
    pub fn next_above(self, order: u32) -> Option<u32> {
        let above = self.0 & (u128::MAX << order << 1);
        if above == 0 {
            None
        } else {
            Some(above.trailing_zeros())
        }
    }

    /// True if the two rightmost trees have adjacent orders and can fuse
    /// into the next order. This is the skew-binary carry pattern; it is a
    /// register test, never a size comparison.
    #[inline]
    pub fn fuse_ready(self) -> bool {
        match self.lowest() {
            Some(k) => k + 1 < 128 && self.contains(k + 1),
            None => false,
        }
    }

    /// Number of trees in the forest.
    #[inline]
    pub fn tree_count(self) -> u32 {
        self.0.count_ones()
    }
}
