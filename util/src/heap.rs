//! Mergeable min-priority queue.
//!
//! A Fibonacci heap whose nodes live in an index arena. Sibling rings and
//! parent/child links are slot indices instead of pointers, so cuts and
//! teardown never chase dangling references. Removed slots are recycled, and
//! every [`Handle`] carries a generation counter so a handle to an extracted
//! node can't alias whatever later moves into its slot.

use std::collections::TryReserveError;

/// Reference to a node in a [`FibHeap`].
///
/// Stays valid until the node is popped or removed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Handle {
    idx: usize,
    generation: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum HeapError {
    #[error("priority queue allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    #[error("stale priority queue handle {0:?}")]
    StaleHandle(Handle),
}

#[derive(Clone, Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    parent: Option<usize>,
    child: Option<usize>,
    left: usize,
    right: usize,
    degree: usize,
    /// Lost a child since this node last became a child itself.
    marked: bool,
}

#[derive(Clone, Debug)]
pub struct FibHeap<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    generations: Vec<u32>,
    /// Slots in `nodes` left vacant by extractions.
    reusable_indices: Vec<usize>,
    min: Option<usize>,
    len: usize,
    /// Consolidation work space, kept between extractions.
    roots: Vec<usize>,
    degrees: Vec<Option<usize>>,
}

impl<K, V> Default for FibHeap<K, V> {
    fn default() -> Self {
        FibHeap {
            nodes: Default::default(),
            generations: Default::default(),
            reusable_indices: Default::default(),
            min: None,
            len: 0,
            roots: Default::default(),
            degrees: Default::default(),
        }
    }
}

impl<K: Ord, V> FibHeap<K, V> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add a new value to the heap.
    ///
    /// The only failure mode is running out of memory, in which case the heap
    /// is left unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<Handle, HeapError> {
        let idx = if let Some(reuse) = self.reusable_indices.pop() {
            reuse
        } else {
            self.nodes.try_reserve(1)?;
            self.generations.try_reserve(1)?;
            self.nodes.push(None);
            self.generations.push(0);
            self.nodes.len() - 1
        };

        self.nodes[idx] = Some(Node {
            key,
            value,
            parent: None,
            child: None,
            left: idx,
            right: idx,
            degree: 0,
            marked: false,
        });
        self.add_root(idx);
        self.len += 1;

        Ok(Handle {
            idx,
            generation: self.generations[idx],
        })
    }

    /// Smallest key and its value.
    pub fn peek_min(&self) -> Option<(&K, &V)> {
        self.min.map(|m| {
            let node = self.node(m);
            (&node.key, &node.value)
        })
    }

    /// Remove and return the entry with the smallest key.
    ///
    /// Entries with equal keys come out in an unspecified order.
    pub fn pop_min(&mut self) -> Result<Option<(K, V)>, HeapError> {
        let Some(z) = self.min else {
            return Ok(None);
        };
        self.reserve_scratch()?;
        Ok(Some(self.extract(z)))
    }

    /// Lower the key of a node.
    ///
    /// Returns `false` and leaves the heap untouched if `key` is not smaller
    /// than the current key.
    pub fn decrease_key(
        &mut self,
        handle: Handle,
        key: K,
    ) -> Result<bool, HeapError> {
        let x = self.resolve(handle)?;
        if key >= self.node(x).key {
            return Ok(false);
        }

        self.node_mut(x).key = key;
        if let Some(y) = self.node(x).parent {
            if self.node(x).key < self.node(y).key {
                self.cut(x, y);
                self.cascading_cut(y);
            }
        }

        if let Some(m) = self.min {
            if self.node(x).key < self.node(m).key {
                self.min = Some(x);
            }
        }
        Ok(true)
    }

    /// Remove an arbitrary node from the heap.
    pub fn remove(&mut self, handle: Handle) -> Result<(K, V), HeapError> {
        let x = self.resolve(handle)?;
        self.reserve_scratch()?;
        if let Some(y) = self.node(x).parent {
            self.cut(x, y);
            self.cascading_cut(y);
        }
        Ok(self.extract(x))
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.resolve(handle).is_ok()
    }

    pub fn key(&self, handle: Handle) -> Option<&K> {
        let idx = self.resolve(handle).ok()?;
        Some(&self.node(idx).key)
    }

    pub fn get(&self, handle: Handle) -> Option<&V> {
        let idx = self.resolve(handle).ok()?;
        Some(&self.node(idx).value)
    }

    /// Mutable access to a value. The key is not affected.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut V> {
        let idx = self.resolve(handle).ok()?;
        Some(&mut self.node_mut(idx).value)
    }

    /// Drop every node. All existing handles become stale.
    pub fn clear(&mut self) {
        self.reusable_indices.clear();
        for (idx, slot) in self.nodes.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.generations[idx] = self.generations[idx].wrapping_add(1);
            }
            self.reusable_indices.push(idx);
        }
        self.min = None;
        self.len = 0;
    }

    fn resolve(&self, handle: Handle) -> Result<usize, HeapError> {
        match (
            self.generations.get(handle.idx),
            self.nodes.get(handle.idx),
        ) {
            (Some(&generation), Some(Some(_)))
                if generation == handle.generation =>
            {
                Ok(handle.idx)
            }
            _ => Err(HeapError::StaleHandle(handle)),
        }
    }

    fn node(&self, idx: usize) -> &Node<K, V> {
        self.nodes[idx]
            .as_ref()
            .expect("FibHeap: Accessing removed node")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        self.nodes[idx]
            .as_mut()
            .expect("FibHeap: Accessing removed node")
    }

    /// Reserve everything `extract` allocates, so a failed allocation is
    /// reported before the structure is modified.
    ///
    /// The buffers only grow when the heap has grown past their capacity.
    fn reserve_scratch(&mut self) -> Result<(), HeapError> {
        self.roots.clear();
        self.roots.try_reserve(self.len)?;

        let n = degree_table_len(self.len);
        self.degrees.clear();
        self.degrees.try_reserve(n)?;
        self.degrees.resize(n, None);

        self.reusable_indices.try_reserve(1)?;
        Ok(())
    }

    /// Detach node `z` and return its contents. `z` must be a root.
    fn extract(&mut self, z: usize) -> (K, V) {
        debug_assert!(self.node(z).parent.is_none());

        // Promote children into the root ring.
        if let Some(child) = self.node_mut(z).child.take() {
            let mut c = child;
            loop {
                let n = self.node_mut(c);
                n.parent = None;
                n.marked = false;
                c = n.right;
                if c == child {
                    break;
                }
            }
            self.merge_rings(z, child);
        }

        let rest = self.unlink(z);
        let node = self.nodes[z]
            .take()
            .expect("FibHeap: Accessing removed node");
        self.generations[z] = self.generations[z].wrapping_add(1);
        self.reusable_indices.push(z);
        self.len -= 1;

        match rest {
            None => self.min = None,
            Some(root) => self.consolidate(root),
        }

        (node.key, node.value)
    }

    /// Link trees of equal degree until every root degree is unique, then
    /// find the new minimum among the survivors.
    fn consolidate(&mut self, start: usize) {
        let mut roots = std::mem::take(&mut self.roots);
        let mut degrees = std::mem::take(&mut self.degrees);

        let mut i = start;
        loop {
            roots.push(i);
            i = self.node(i).right;
            if i == start {
                break;
            }
        }

        for &w in &roots {
            let mut x = w;
            let mut d = self.node(x).degree;
            loop {
                if d >= degrees.len() {
                    degrees.resize(d + 1, None);
                }
                let Some(mut y) = degrees[d].take() else {
                    break;
                };
                if self.node(y).key < self.node(x).key {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                d += 1;
            }
            degrees[d] = Some(x);
        }

        self.min = None;
        for &x in degrees.iter().flatten() {
            match self.min {
                Some(m) if self.node(m).key <= self.node(x).key => {}
                _ => self.min = Some(x),
            }
        }

        self.roots = roots;
        self.degrees = degrees;
    }

    /// Make root `y` a child of root `x`.
    fn link(&mut self, y: usize, x: usize) {
        self.unlink(y);
        match self.node(x).child {
            Some(c) => self.splice(c, y),
            None => self.node_mut(x).child = Some(y),
        }
        let n = self.node_mut(y);
        n.parent = Some(x);
        n.marked = false;
        self.node_mut(x).degree += 1;
    }

    /// Move `x` from the child ring of `y` into the root ring.
    fn cut(&mut self, x: usize, y: usize) {
        let rest = self.unlink(x);
        let parent = self.node_mut(y);
        if parent.child == Some(x) {
            parent.child = rest;
        }
        parent.degree -= 1;

        let n = self.node_mut(x);
        n.parent = None;
        n.marked = false;
        self.add_root(x);
    }

    fn cascading_cut(&mut self, mut y: usize) {
        while let Some(z) = self.node(y).parent {
            if !self.node(y).marked {
                self.node_mut(y).marked = true;
                return;
            }
            self.cut(y, z);
            y = z;
        }
    }

    /// Put singleton `idx` in the root ring and update the minimum.
    fn add_root(&mut self, idx: usize) {
        match self.min {
            None => self.min = Some(idx),
            Some(m) => {
                self.splice(m, idx);
                if self.node(idx).key < self.node(m).key {
                    self.min = Some(idx);
                }
            }
        }
    }

    /// Insert singleton `idx` to the right of `anchor` in anchor's ring.
    fn splice(&mut self, anchor: usize, idx: usize) {
        let right = self.node(anchor).right;
        let n = self.node_mut(idx);
        n.left = anchor;
        n.right = right;
        self.node_mut(anchor).right = idx;
        self.node_mut(right).left = idx;
    }

    /// Join two disjoint rings into one.
    fn merge_rings(&mut self, a: usize, b: usize) {
        let a_right = self.node(a).right;
        let b_left = self.node(b).left;
        self.node_mut(a).right = b;
        self.node_mut(b).left = a;
        self.node_mut(b_left).right = a_right;
        self.node_mut(a_right).left = b_left;
    }

    /// Take `idx` out of its ring, leaving it a singleton. Returns some other
    /// member of the ring if there was one.
    fn unlink(&mut self, idx: usize) -> Option<usize> {
        let (left, right) = {
            let n = self.node(idx);
            (n.left, n.right)
        };
        if right == idx {
            return None;
        }
        self.node_mut(left).right = right;
        self.node_mut(right).left = left;
        let n = self.node_mut(idx);
        n.left = idx;
        n.right = idx;
        Some(right)
    }
}

/// Size of the degree table used to consolidate a heap of `n` nodes.
///
/// Starts from `floor(log2(max(n - 1, 1))) + 1`. The `max` keeps heaps of
/// zero to two nodes from producing an empty table. Cuts can leave trees
/// thinner than binomial ones, which lets degrees grow up to log_phi(n), so
/// the binary bound is scaled by 3/2 > 1 / log2(phi).
fn degree_table_len(n: usize) -> usize {
    let log2 = n.saturating_sub(1).max(1).ilog2() as usize;
    (log2 + 1) * 3 / 2 + 1
}
