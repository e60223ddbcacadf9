//! Track operation counters for a [`RingList`](crate::RingList).

/// Per-list operation statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Counters {
    /// Total number of nodes ever linked into the ring.
    pub total_push_count: u64,
    /// Total number of nodes unlinked and released, whether by `remove`,
    /// a pop, `clear`, or teardown.
    pub total_remove_count: u64,
    /// Number of `remove` calls that scanned the whole ring without a match.
    pub remove_miss_count: u64,
}

impl Counters {
    pub const fn new() -> Self {
        Self { total_push_count: 0, total_remove_count: 0, remove_miss_count: 0 }
    }

    /// Returns the number of pushed nodes not yet removed.
    pub const fn live_node_count(&self) -> u64 {
        self.total_push_count - self.total_remove_count
    }

    pub(crate) fn account_push(&mut self) {
        self.total_push_count += 1;
    }

    pub(crate) fn account_remove(&mut self) {
        self.total_remove_count += 1;
    }

    pub(crate) fn account_miss(&mut self) {
        self.remove_miss_count += 1;
    }
}

impl<T, A: allocator_api2::alloc::Allocator> crate::RingList<T, A> {
    pub fn counters(&self) -> &Counters {
        &self.counters
    }
}
