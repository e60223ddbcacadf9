#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod error;
mod ring;

#[cfg(feature = "counters")]
mod counters;

pub use error::NotFound;

#[cfg(feature = "counters")]
pub use counters::Counters;

pub use allocator_api2::alloc::AllocError;

use allocator_api2::alloc::{Allocator, Global, Layout};
use ring::{Link, Node, RawIter};

use alloc::alloc::handle_alloc_error;
use core::{cell::Cell, fmt, marker::PhantomData, ptr::NonNull};

/// A circular sentinel doubly-linked list.
///
/// The ring is anchored by one permanent, payload-free sentinel link which the
/// list allocates on construction and releases on drop. An empty list is the
/// sentinel linked to itself both ways, so no operation ever branches on a
/// null pointer: pushes rewire four pointers next to the sentinel, removal
/// unlinks the first match of a forward scan, and traversal ends when it walks
/// back into the sentinel.
///
/// The list exclusively owns every payload node. Nodes are allocated from `A`
/// (the global allocator by default) and released exactly once, on removal or
/// teardown; a list holding `n` keys accounts for exactly `n + 1` live
/// allocations.
///
/// Not thread-safe: no internal locking is provided. The list is `Send` when
/// `T` is, and all mutation requires `&mut self`, so mutating a ring that is
/// being traversed cannot be expressed.
pub struct RingList<T, A: Allocator = Global> {
    sentinel: NonNull<Link>,
    len: usize,
    alloc: A,
    #[cfg(feature = "counters")]
    counters: counters::Counters,
    _owns: PhantomData<T>,
}

unsafe impl<T: Send, A: Allocator + Send> Send for RingList<T, A> {}

impl<T> RingList<T> {
    /// Create an empty list backed by the global allocator.
    pub fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<T> Default for RingList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> RingList<T, A> {
    /// Create an empty list backed by `alloc`.
    ///
    /// Diverts to [`handle_alloc_error`] if the sentinel cannot be allocated.
    pub fn new_in(alloc: A) -> Self {
        match Self::try_new_in(alloc) {
            Ok(list) => list,
            Err(AllocError) => handle_alloc_error(Layout::new::<Link>()),
        }
    }

    /// Create an empty list backed by `alloc`, surfacing sentinel allocation
    /// failure instead of diverting.
    pub fn try_new_in(alloc: A) -> Result<Self, AllocError> {
        let sentinel = alloc.allocate(Layout::new::<Link>())?.cast::<Link>();
        unsafe { Link::init(sentinel.as_ptr()) };

        Ok(Self {
            sentinel,
            len: 0,
            alloc,
            #[cfg(feature = "counters")]
            counters: counters::Counters::new(),
            _owns: PhantomData,
        })
    }

    /// Returns `true` iff the sentinel's ring contains no payload nodes.
    pub fn is_empty(&self) -> bool {
        let empty = unsafe { (*self.sentinel.as_ptr()).next.get() } == self.sentinel.as_ptr();
        debug_assert_eq!(empty, self.len == 0);
        empty
    }

    /// Returns the number of payload nodes in the ring.
    pub fn len(&self) -> usize {
        self.len
    }

    fn is_sentinel(&self, link: *mut Link) -> bool {
        link == self.sentinel.as_ptr()
    }

    /// Allocate an isolated payload node, ready to be linked into the ring.
    fn allocate_node(&self, key: T) -> Result<*mut Link, AllocError> {
        let node = self.alloc.allocate(Layout::new::<Node<T>>())?.cast::<Node<T>>().as_ptr();
        let link = node.cast::<Link>();

        unsafe {
            node.write(Node { link: Link { next: Cell::new(link), prev: Cell::new(link) }, key });
        }

        Ok(link)
    }

    /// Unlink `link` from the ring, release its node and return the key.
    ///
    /// # Safety
    /// `link` must be a payload node of this list's ring, never the sentinel.
    unsafe fn detach(&mut self, link: *mut Link) -> T {
        debug_assert!(!self.is_sentinel(link));

        ring::unlink(link);
        self.len -= 1;

        #[cfg(feature = "counters")]
        self.counters.account_remove();

        let node = link.cast::<Node<T>>();
        let key = core::ptr::addr_of!((*node).key).read();
        self.alloc.deallocate(NonNull::new_unchecked(node.cast::<u8>()), Layout::new::<Node<T>>());
        key
    }

    fn attach(&mut self, anchor: *mut Link, entry: *mut Link) {
        unsafe { ring::link_after(anchor, entry) };
        self.len += 1;

        #[cfg(feature = "counters")]
        self.counters.account_push();
    }

    /// Push `key` to the front of the traversal order, directly after the
    /// sentinel. Later pushes appear before earlier ones.
    ///
    /// Diverts to [`handle_alloc_error`] if the node cannot be allocated; the
    /// fallible variant is [`try_push_front`](RingList::try_push_front).
    pub fn push_front(&mut self, key: T) {
        if self.try_push_front(key).is_err() {
            handle_alloc_error(Layout::new::<Node<T>>());
        }
    }

    /// Push `key` to the back of the traversal order, directly before the
    /// sentinel.
    pub fn push_back(&mut self, key: T) {
        if self.try_push_back(key).is_err() {
            handle_alloc_error(Layout::new::<Node<T>>());
        }
    }

    /// Fallible [`push_front`](RingList::push_front). A failed allocation
    /// leaves the ring unchanged and drops `key`.
    pub fn try_push_front(&mut self, key: T) -> Result<(), AllocError> {
        let entry = self.allocate_node(key)?;
        self.attach(self.sentinel.as_ptr(), entry);
        Ok(())
    }

    /// Fallible [`push_back`](RingList::push_back). A failed allocation
    /// leaves the ring unchanged and drops `key`.
    pub fn try_push_back(&mut self, key: T) -> Result<(), AllocError> {
        let entry = self.allocate_node(key)?;
        let tail = unsafe { (*self.sentinel.as_ptr()).prev.get() };
        self.attach(tail, entry);
        Ok(())
    }

    /// Remove and return the first node carrying `key` in traversal order.
    /// Duplicates further along the ring are left in place.
    ///
    /// A miss returns [`NotFound`] and leaves the list unchanged.
    pub fn remove(&mut self, key: &T) -> Result<T, NotFound>
    where
        T: PartialEq,
    {
        let mut cur = unsafe { (*self.sentinel.as_ptr()).next.get() };

        while !self.is_sentinel(cur) {
            let node = cur.cast::<Node<T>>();
            if unsafe { &(*node).key } == key {
                return Ok(unsafe { self.detach(cur) });
            }
            cur = unsafe { (*cur).next.get() };
        }

        #[cfg(feature = "counters")]
        self.counters.account_miss();

        Err(NotFound)
    }

    /// Returns `true` if some node in the ring carries `key`.
    pub fn contains(&self, key: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|k| k == key)
    }

    /// Remove and return the key directly after the sentinel, if any.
    pub fn pop_front(&mut self) -> Option<T> {
        let first = unsafe { (*self.sentinel.as_ptr()).next.get() };
        if self.is_sentinel(first) {
            None
        } else {
            Some(unsafe { self.detach(first) })
        }
    }

    /// Remove and return the key directly before the sentinel, if any.
    pub fn pop_back(&mut self) -> Option<T> {
        let last = unsafe { (*self.sentinel.as_ptr()).prev.get() };
        if self.is_sentinel(last) {
            None
        } else {
            Some(unsafe { self.detach(last) })
        }
    }

    /// Returns a reference to the front key, if any.
    pub fn front(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Returns a reference to the back key, if any.
    pub fn back(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Iterate the keys from front to back.
    ///
    /// Every call starts fresh at the sentinel's successor; no traversal state
    /// is retained across calls.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { raw: unsafe { RawIter::new(self.sentinel.as_ptr()) }, _list: PhantomData }
    }

    /// Detach and release every payload node. The sentinel and the list stay
    /// fully usable.
    pub fn clear(&mut self) {
        // after each detach the new front is adjacent to the sentinel again
        while !self.is_empty() {
            let first = unsafe { (*self.sentinel.as_ptr()).next.get() };
            drop(unsafe { self.detach(first) });
        }
    }
}

impl<T, A: Allocator> Drop for RingList<T, A> {
    fn drop(&mut self) {
        self.clear();
        unsafe {
            self.alloc.deallocate(self.sentinel.cast::<u8>(), Layout::new::<Link>());
        }
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for RingList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, A: Allocator> fmt::Display for RingList<T, A> {
    /// Renders the traversal as `head<-> 5<-> 8<-> 2<-> end`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("head<-> ")?;
        for key in self.iter() {
            write!(f, "{key}<-> ")?;
        }
        f.write_str("end")
    }
}

impl<T, A: Allocator> Extend<T> for RingList<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.push_back(key);
        }
    }
}

impl<T> FromIterator<T> for RingList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

/// An iterator over the keys of a [`RingList`], front to back.
///
/// This `struct` is created by [`RingList::iter`]. See its documentation for
/// more.
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    raw: RawIter,
    _list: PhantomData<&'a RingList<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|link| unsafe { &(*link.cast::<Node<T>>()).key })
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.raw.next_back().map(|link| unsafe { &(*link.cast::<Node<T>>()).key })
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a RingList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// An owning iterator over the keys of a [`RingList`], front to back.
///
/// Each step detaches and releases the node it yields; dropping the iterator
/// tears down whatever remains of the list.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoIter<T, A: Allocator = Global>(RingList<T, A>);

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.0).finish()
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.0.pop_back()
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> IntoIterator for RingList<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter(self)
    }
}
