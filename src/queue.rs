//! # Leveled Ready Queues
//!
//! Three insertion-ordered queues of [`ThreadId`] handles, one per
//! priority band. A thread is a member of at most one band at a time;
//! the scheduler moves handles between bands on admission, selection,
//! and aging promotion.
//!
//! Queues are fixed-capacity arrays (no heap): capacity equals the
//! thread-table size, so a band can never legitimately overflow.

use crate::config::{BAND1_PRIORITY, BAND2_PRIORITY, MAX_THREADS};
use crate::thread::ThreadId;
use core::fmt;

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

/// One of the three priority partitions of the ready set.
/// L1 is the highest band, L3 the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// `priority >= 100` — selected shortest-estimated-burst-first.
    L1,
    /// `50 <= priority < 100` — selected highest-priority-first.
    L2,
    /// `priority < 50` — strict FIFO.
    L3,
}

impl Band {
    /// All bands, highest first. Selection and iteration follow this order.
    pub const ALL: [Band; 3] = [Band::L1, Band::L2, Band::L3];

    /// The band a given priority value maps to. Re-evaluated on every
    /// aging pass, never fixed at creation.
    pub fn for_priority(priority: i32) -> Band {
        if priority >= BAND1_PRIORITY {
            Band::L1
        } else if priority >= BAND2_PRIORITY {
            Band::L2
        } else {
            Band::L3
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::L1 => write!(f, "L1"),
            Band::L2 => write!(f, "L2"),
            Band::L3 => write!(f, "L3"),
        }
    }
}

// ---------------------------------------------------------------------------
// Single band queue
// ---------------------------------------------------------------------------

/// Insertion-ordered queue of thread handles for one band.
pub struct BandQueue {
    slots: [ThreadId; MAX_THREADS],
    len: usize,
}

impl BandQueue {
    pub const fn new() -> Self {
        Self {
            slots: [ThreadId::PLACEHOLDER; MAX_THREADS],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a handle at the tail. Overflow is a fatal invariant breach:
    /// a band cannot hold more threads than the table can allocate.
    pub fn push_back(&mut self, id: ThreadId) {
        assert!(self.len < MAX_THREADS, "band queue overflow");
        self.slots[self.len] = id;
        self.len += 1;
    }

    /// The handle at the head, if any.
    pub fn front(&self) -> Option<ThreadId> {
        if self.len == 0 {
            None
        } else {
            Some(self.slots[0])
        }
    }

    /// Remove and return the head, or `None` if the band is empty.
    pub fn pop_front(&mut self) -> Option<ThreadId> {
        let id = self.front()?;
        self.remove(id);
        Some(id)
    }

    /// The handle at position `index` (insertion order).
    pub fn at(&self, index: usize) -> ThreadId {
        assert!(index < self.len, "band queue index out of range");
        self.slots[index]
    }

    /// Remove a specific handle, preserving the order of the rest.
    /// Returns false if the handle was not a member.
    pub fn remove(&mut self, id: ThreadId) -> bool {
        let Some(pos) = self.slots[..self.len].iter().position(|&slot| slot == id) else {
            return false;
        };
        for i in pos..self.len - 1 {
            self.slots[i] = self.slots[i + 1];
        }
        self.len -= 1;
        self.slots[self.len] = ThreadId::PLACEHOLDER;
        true
    }

    pub fn contains(&self, id: ThreadId) -> bool {
        self.slots[..self.len].contains(&id)
    }

    /// Iterate members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ThreadId> + '_ {
        self.slots[..self.len].iter().copied()
    }
}

impl Default for BandQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// The leveled queue set
// ---------------------------------------------------------------------------

/// The three-band ready set.
pub struct LeveledQueues {
    l1: BandQueue,
    l2: BandQueue,
    l3: BandQueue,
}

impl LeveledQueues {
    pub const fn new() -> Self {
        Self {
            l1: BandQueue::new(),
            l2: BandQueue::new(),
            l3: BandQueue::new(),
        }
    }

    pub fn band(&self, band: Band) -> &BandQueue {
        match band {
            Band::L1 => &self.l1,
            Band::L2 => &self.l2,
            Band::L3 => &self.l3,
        }
    }

    pub fn band_mut(&mut self, band: Band) -> &mut BandQueue {
        match band {
            Band::L1 => &mut self.l1,
            Band::L2 => &mut self.l2,
            Band::L3 => &mut self.l3,
        }
    }

    /// Append `id` to the tail of `band`. A handle may be a member of at
    /// most one band; inserting a handle that is already queued anywhere
    /// is a membership-invariant breach.
    pub fn insert(&mut self, id: ThreadId, band: Band) {
        debug_assert!(
            self.band_of(id).is_none(),
            "thread {} is already queued",
            id
        );
        self.band_mut(band).push_back(id);
    }

    /// The band `id` is currently queued in, if any.
    pub fn band_of(&self, id: ThreadId) -> Option<Band> {
        Band::ALL
            .into_iter()
            .find(|&band| self.band(band).contains(id))
    }

    /// True iff all three bands are empty.
    pub fn is_empty_all(&self) -> bool {
        self.l1.is_empty() && self.l2.is_empty() && self.l3.is_empty()
    }
}

impl Default for LeveledQueues {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
