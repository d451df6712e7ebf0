/// Handle to a node stored in a [`ChainPool`].
///
/// Handles are plain indices; a handle stays valid until the node it names is
/// released, after which the slot may be handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    fn index(self) -> usize {
        self.0
    }
}

/// One link of a bucket chain.
#[derive(Debug, Clone)]
pub struct ChainNode<K, V> {
    pub key: K,
    pub value: V,
    pub next: Option<NodeId>,
}

#[derive(Debug, Clone)]
enum Slot<K, V> {
    Occupied(ChainNode<K, V>),
    Vacant { next_free: Option<NodeId> },
}

/// Node arena backing every chain of a hash table.
///
/// Nodes are addressed by [`NodeId`] instead of owning pointers, so relinking a
/// chain is an index update and a resize never moves a node. Released slots are
/// threaded onto a free list and reused by later allocations.
#[derive(Debug, Clone)]
pub struct ChainPool<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Option<NodeId>,
    live: usize,
}

impl<K, V> ChainPool<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            live: 0,
        }
    }

    /// Store a node and return its handle, reusing a released slot if one exists.
    pub fn alloc(&mut self, key: K, value: V, next: Option<NodeId>) -> NodeId {
        let node = ChainNode { key, value, next };
        self.live += 1;

        if let Some(id) = self.free_head {
            if let Slot::Vacant { next_free } = self.slots[id.index()] {
                self.free_head = next_free;
                self.slots[id.index()] = Slot::Occupied(node);
                return id;
            }
        }

        let id = NodeId(self.slots.len());
        self.slots.push(Slot::Occupied(node));
        id
    }

    /// Remove the node behind `id` and return it. The slot joins the free list.
    pub fn release(&mut self, id: NodeId) -> Option<ChainNode<K, V>> {
        let slot = self.slots.get_mut(id.index())?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }

        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match std::mem::replace(slot, vacant) {
            Slot::Occupied(node) => {
                self.free_head = Some(id);
                self.live -= 1;
                Some(node)
            }
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&ChainNode<K, V>> {
        match self.slots.get(id.index())? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ChainNode<K, V>> {
        match self.slots.get_mut(id.index())? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every node and forget the free list.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }
}

impl<K, V> Default for ChainPool<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
