use core::cell::Cell;

/// The intrusive link header of a ring member.
///
/// The ring is:
///  * **Intrusive** to minimize indirection
///  * **Circular** to minimize branches
///  * Anchored by a **sentinel** link which is homogenous, but isn't iterated over
///  * **Doubly linked** to allow bidirectional traversal and single ref removal
///
/// `next` and `prev` are non-owning in both directions; the list owning the
/// ring is responsible for every member's allocation.
///
/// ### Safety:
/// `Link`s are inherently unsafe due to the referencial dependency between
/// members, as well as the self-referencial configuration of rings of length 1.
/// This requires that `Link`s are never moved while linked, otherwise using
/// the ring becomes memory unsafe and may lead to undefined behaviour.
#[repr(C)]
#[derive(Debug)]
pub(crate) struct Link {
    pub(crate) next: Cell<*mut Link>,
    pub(crate) prev: Cell<*mut Link>,
}

/// A payload-carrying ring member.
///
/// `#[repr(C)]` with the link first, so a `*mut Link` belonging to a payload
/// node and the node's own `*mut Node<T>` are interconvertible by cast. The
/// sentinel is a bare [`Link`]; no payload is ever allocated for it.
#[repr(C)]
pub(crate) struct Node<T> {
    pub(crate) link: Link,
    pub(crate) key: T,
}

impl Link {
    /// Write an isolated ring of one in place.
    ///
    /// ### Safety:
    /// * `link` must be valid for writes and properly aligned.
    #[inline]
    pub(crate) unsafe fn init(link: *mut Self) {
        link.write(Link { next: Cell::new(link), prev: Cell::new(link) });
    }
}

/// Insert `entry` into the ring immediately after `anchor`.
///
/// Rewires four pointers so that `anchor -> entry -> (anchor's old next)`
/// holds along `next`, with the `prev` chain mirroring it. No allocation.
///
/// ### Safety:
/// * `anchor` must be a member of a valid ring.
/// * `entry` must be isolated (self-linked, not a member of any ring).
pub(crate) unsafe fn link_after(anchor: *mut Link, entry: *mut Link) {
    debug_assert!((*entry).next.get() == entry);
    debug_assert!((*entry).prev.get() == entry);

    let next = (*anchor).next.get();

    (*entry).next.set(next);
    (*entry).prev.set(anchor);

    (*next).prev.set(entry);
    (*anchor).next.set(entry);
}

/// Remove `entry` from its ring, leaving it an isolated ring of one.
///
/// The predecessor is read from `entry` itself, so there is no predecessor
/// argument for a caller to get wrong. If `entry` is linked only to itself,
/// this is effectively a no-op.
///
/// ### Safety:
/// * `entry` must be a member of a valid ring.
pub(crate) unsafe fn unlink(entry: *mut Link) {
    let prev = (*entry).prev.get();
    let next = (*entry).next.get();
    (*prev).next.set(next);
    (*next).prev.set(prev);

    // reset the links so a stale pointer can never walk back into the ring
    (*entry).next.set(entry);
    (*entry).prev.set(entry);
}

/// A double-ended walk over a ring's members, excluding the sentinel.
///
/// Termination is sentinel identity: the walk is over once the two cursors
/// meet, and it never starts if the sentinel is self-linked. There is no
/// null-pointer case.
#[derive(Debug, Clone, Copy)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub(crate) struct RawIter {
    forward: *mut Link,
    backward: *mut Link,
    ongoing: bool,
}

impl RawIter {
    /// Create a new walk over `sentinel`'s ring, *except* `sentinel`.
    ///
    /// ### Safety:
    /// `sentinel`'s ring must remain in a valid state during iteration.
    pub(crate) unsafe fn new(sentinel: *mut Link) -> Self {
        Self {
            forward: (*sentinel).next.get(),
            backward: (*sentinel).prev.get(),
            ongoing: sentinel != (*sentinel).next.get(),
        }
    }
}

impl Iterator for RawIter {
    type Item = *mut Link;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ongoing {
            let ret = self.forward;
            if self.forward == self.backward {
                self.ongoing = false;
            }
            self.forward = unsafe { (*self.forward).next.get() };
            Some(ret)
        } else {
            None
        }
    }
}

impl DoubleEndedIterator for RawIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.ongoing {
            let ret = self.backward;
            if self.forward == self.backward {
                self.ongoing = false;
            }
            self.backward = unsafe { (*self.backward).prev.get() };
            Some(ret)
        } else {
            None
        }
    }
}
