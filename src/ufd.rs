//! Disjoint-set scratch structure and the dense class arena.
//!
//! [`Ufd`] is a plain union-find over `0..len` with path compression and
//! union by rank. A fusion step resets it, merges agreeing pixel pairs, and
//! then freezes the resulting partition into a [`ClassArena`]: a bijection
//! from class representatives to the contiguous range `[0, K)` used to index
//! the contracted graph. The arena is rebuilt fresh for every fuse call and
//! never cached.

use rustc_hash::FxHashMap;

/// Union-find over the elements `0..len`.
#[derive(Debug, Clone)]
pub struct Ufd {
    parent: Vec<usize>,
    rank: Vec<u8>,
    num_classes: usize,
}

impl Ufd {
    /// Create `len` singleton classes.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
            num_classes: len,
        }
    }

    /// Number of elements (fixed at construction).
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// True if the structure holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Current number of disjoint classes.
    #[inline]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Return every element to its own singleton class.
    pub fn reset(&mut self) {
        for (element, parent) in self.parent.iter_mut().enumerate() {
            *parent = element;
        }
        self.rank.fill(0);
        self.num_classes = self.parent.len();
    }

    /// Representative of `element`'s class, compressing the path walked.
    pub fn find(&mut self, mut element: usize) -> usize {
        while self.parent[element] != element {
            self.parent[element] = self.parent[self.parent[element]];
            element = self.parent[element];
        }
        element
    }

    /// Merge the classes of `a` and `b`. Returns `(root, absorbed)` for the
    /// surviving and the absorbed representative, or `None` if the elements
    /// already share a class.
    pub fn merge(&mut self, a: usize, b: usize) -> Option<(usize, usize)> {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return None;
        }
        self.num_classes -= 1;
        let (root, absorbed) = match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => (rb, ra),
            std::cmp::Ordering::Greater => (ra, rb),
            std::cmp::Ordering::Equal => {
                self.rank[ra] += 1;
                (ra, rb)
            }
        };
        self.parent[absorbed] = root;
        Some((root, absorbed))
    }
}

/// Dense relabeling of a frozen partition: representative id → `[0, K)`.
///
/// Indices are assigned in order of first appearance when scanning elements
/// `0..len`, so they are deterministic for a given partition.
#[derive(Debug, Clone)]
pub struct ClassArena {
    to_dense: FxHashMap<usize, usize>,
}

impl ClassArena {
    /// Scan every element of `ufd` and register its representative.
    pub fn from_ufd(ufd: &mut Ufd) -> Self {
        let mut to_dense = FxHashMap::default();
        to_dense.reserve(ufd.num_classes());
        for element in 0..ufd.len() {
            let representative = ufd.find(element);
            let next = to_dense.len();
            to_dense.entry(representative).or_insert(next);
        }
        Self { to_dense }
    }

    /// Number of classes K.
    #[inline]
    pub fn len(&self) -> usize {
        self.to_dense.len()
    }

    /// True if the partition had no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.to_dense.is_empty()
    }

    /// Dense index of `representative`.
    ///
    /// # Panics
    /// Panics if `representative` was not a class representative when the
    /// arena was built.
    #[inline]
    pub fn dense_index(&self, representative: usize) -> usize {
        *self
            .to_dense
            .get(&representative)
            .expect("representative not registered in arena")
    }
}
