/// Status returned by [`RingList::remove`](crate::RingList::remove) when no
/// node in the ring carries the requested key. The list is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

impl core::fmt::Display for NotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("cannot find a node with a matching key")
    }
}

impl core::error::Error for NotFound {}
