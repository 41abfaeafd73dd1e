use alloc::vec::Vec;

/// Sentinel index standing in for an absent child, parent or root.
pub const NIL: usize = usize::MAX;

/// Node storage shared by the tree variants.
///
/// Nodes are addressed by index, so links between them are plain `usize`
/// values and back-references never own anything. Freed slots are pushed on
/// a LIFO free list and handed out again before the backing vector grows.
#[derive(Debug, Clone)]
pub struct Arena<N> {
    /// Node slots, live or freed
    nodes: Vec<N>,

    /// Stack of freed slot indices available for reuse
    free_list: Vec<usize>,

    /// Per-slot freed flag, checked on access and release
    #[cfg(debug_assertions)]
    freed: Vec<bool>,
}

impl<N> Arena<N> {
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            #[cfg(debug_assertions)]
            freed: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            #[cfg(debug_assertions)]
            freed: Vec::with_capacity(capacity),
        }
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn allocate(&mut self, node: N) -> usize {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        #[cfg(debug_assertions)]
        self.mark(idx, false);

        idx
    }

    #[inline]
    pub fn deallocate(&mut self, idx: usize) {
        debug_assert!(idx < self.nodes.len());
        #[cfg(debug_assertions)]
        {
            debug_assert!(!self.freed[idx], "double free of node {idx}");
            self.mark(idx, true);
        }
        self.free_list.push(idx);
    }

    #[inline]
    pub fn get(&self, idx: usize) -> &N {
        debug_assert!(idx != NIL, "dereferenced the sentinel");
        #[cfg(debug_assertions)]
        debug_assert!(!self.freed.get(idx).copied().unwrap_or(false), "read freed node {idx}");
        &self.nodes[idx]
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> &mut N {
        debug_assert!(idx != NIL, "dereferenced the sentinel");
        #[cfg(debug_assertions)]
        debug_assert!(!self.freed.get(idx).copied().unwrap_or(false), "wrote freed node {idx}");
        &mut self.nodes[idx]
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        #[cfg(debug_assertions)]
        self.freed.clear();
    }

    #[cfg(debug_assertions)]
    fn mark(&mut self, idx: usize, freed: bool) {
        if idx >= self.freed.len() {
            self.freed.resize(idx + 1, false);
        }
        self.freed[idx] = freed;
    }
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}
