//! # Thread Control Block
//!
//! Defines the thread model consumed by the scheduler: identity, run
//! status, priority, burst bookkeeping, wait accounting, the optional
//! user-mode context marker, and the stack-overflow guard word.
//!
//! Threads live in a fixed-size [`ThreadTable`] arena. The scheduler's
//! ready queues hold lightweight [`ThreadId`] handles into the table, so
//! nothing outside the table ever owns a thread — destroying one is a
//! table-slot release, and a stale handle is caught by the accessors.

use crate::config::{INITIAL_BURST_ESTIMATE, MAX_THREADS, STACK_CANARY};
use crate::estimate::{self, BurstFn};
use crate::queue::Band;
use core::fmt;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Stable handle to a thread: an index into the [`ThreadTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadId(pub(crate) usize);

impl ThreadId {
    /// Filler value for unoccupied queue slots. Never handed out.
    pub(crate) const PLACEHOLDER: ThreadId = ThreadId(usize::MAX);

    /// The table index behind this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to a user-mode address space, owned by the embedding
/// kernel's memory layer. The scheduler only checks presence: a thread
/// carrying one has user-visible register and address-space state that the
/// port must save and restore around a context switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSpaceId(pub u32);

// ---------------------------------------------------------------------------
// Thread state machine
// ---------------------------------------------------------------------------

/// Run status of a thread.
///
/// The scheduler moves threads between `Ready` and `Running`; a thread
/// marks itself `Blocked` or `Terminated` before yielding control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStatus {
    /// Waiting in a ready queue for the CPU.
    Ready,
    /// Currently executing on the CPU.
    Running,
    /// Waiting on an event; not schedulable.
    Blocked,
    /// Finished; awaiting deferred destruction.
    Terminated,
}

// ---------------------------------------------------------------------------
// Thread control block
// ---------------------------------------------------------------------------

/// Per-thread state consumed by the scheduler.
pub struct Thread {
    /// Immutable identity; also this thread's slot in the table.
    id: ThreadId,

    /// Current run status.
    status: ThreadStatus,

    /// Scheduling priority. Bands: `>= 100` → L1, `50..=99` → L2,
    /// `< 50` → L3. Raised externally over time (aging); the band is
    /// re-evaluated on every `maintain_queues` pass.
    priority: i32,

    /// Predicted length of the next CPU burst, in ticks. Recomputed by
    /// `close_quantum` via the thread's estimator policy. Band-1 selection
    /// ranks candidates by this value, shortest first.
    execution_estimate: u32,

    /// CPU ticks consumed in the current quantum. Zeroed at close-out.
    used_ticks: u32,

    /// Length of the just-finished quantum, recorded at close-out and
    /// reported in the dispatch event record.
    last_burst: u32,

    /// Accumulated ticks spent ready-but-not-running.
    wait_ticks: u32,

    /// `Some` if this thread owns a user-mode address space whose state
    /// must be saved/restored around a context switch.
    user: Option<UserSpaceId>,

    /// Stack guard word. `check_overflow` is fatal if it no longer reads
    /// `STACK_CANARY`.
    canary: u32,

    /// Burst-estimate policy applied at quantum close-out.
    estimator: BurstFn,
}

impl Thread {
    /// Create a control block with the default estimator policy.
    pub fn new(id: ThreadId, priority: i32, user: Option<UserSpaceId>) -> Self {
        Self::with_estimator(id, priority, user, estimate::exponential_average)
    }

    /// Create a control block with an explicit estimator policy.
    pub fn with_estimator(
        id: ThreadId,
        priority: i32,
        user: Option<UserSpaceId>,
        estimator: BurstFn,
    ) -> Self {
        Self {
            id,
            status: ThreadStatus::Ready,
            priority,
            execution_estimate: INITIAL_BURST_ESTIMATE,
            used_ticks: 0,
            last_burst: 0,
            wait_ticks: 0,
            user,
            canary: STACK_CANARY,
            estimator,
        }
    }

    #[inline]
    pub fn id(&self) -> ThreadId {
        self.id
    }

    #[inline]
    pub fn status(&self) -> ThreadStatus {
        self.status
    }

    #[inline]
    pub fn set_status(&mut self, status: ThreadStatus) {
        self.status = status;
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Raise (or lower) the scheduling priority. Called by the external
    /// aging mechanism; the thread's queue placement catches up on the
    /// next `maintain_queues` pass.
    #[inline]
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// The band this thread belongs in, given its current priority.
    #[inline]
    pub fn band(&self) -> Band {
        Band::for_priority(self.priority)
    }

    #[inline]
    pub fn execution_estimate(&self) -> u32 {
        self.execution_estimate
    }

    #[inline]
    pub fn used_ticks(&self) -> u32 {
        self.used_ticks
    }

    #[inline]
    pub fn last_burst(&self) -> u32 {
        self.last_burst
    }

    #[inline]
    pub fn wait_ticks(&self) -> u32 {
        self.wait_ticks
    }

    #[inline]
    pub fn user_space(&self) -> Option<UserSpaceId> {
        self.user
    }

    /// True if this thread carries user-mode state that the port must
    /// save/restore around a switch.
    #[inline]
    pub fn has_user_space(&self) -> bool {
        self.user.is_some()
    }

    /// Charge `n` ticks of CPU time to the current quantum.
    #[inline]
    pub fn charge_tick(&mut self, n: u32) {
        self.used_ticks = self.used_ticks.saturating_add(n);
    }

    /// Credit `n` ticks of ready-queue waiting.
    #[inline]
    pub fn increment_wait_ticks(&mut self, n: u32) {
        self.wait_ticks = self.wait_ticks.saturating_add(n);
    }

    /// Close out the quantum that just finished: record its length,
    /// recompute the burst estimate through the estimator policy, and
    /// zero the used-time counter for the next quantum.
    pub fn close_quantum(&mut self) {
        self.last_burst = self.used_ticks;
        self.execution_estimate = (self.estimator)(self.used_ticks, self.execution_estimate);
        self.used_ticks = 0;
    }

    /// Verify the stack guard word. A clobbered canary means the thread
    /// overran its stack; continuing dispatch would corrupt the kernel,
    /// so this aborts.
    pub fn check_overflow(&self) {
        assert_eq!(
            self.canary, STACK_CANARY,
            "stack overflow detected on thread {}",
            self.id
        );
    }

    #[cfg(test)]
    pub(crate) fn set_execution_estimate(&mut self, estimate: u32) {
        self.execution_estimate = estimate;
    }

    #[cfg(test)]
    pub(crate) fn clobber_canary(&mut self) {
        self.canary = 0;
    }
}

// ---------------------------------------------------------------------------
// Thread table (arena)
// ---------------------------------------------------------------------------

/// Error returned when a thread cannot be admitted to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    /// Every slot in the fixed-size table is occupied.
    TableFull,
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::TableFull => write!(f, "thread table is full"),
        }
    }
}

/// Fixed-size arena of thread control blocks.
///
/// Queues and the current-thread slot hold [`ThreadId`] handles into this
/// table; released slots may be reused by later allocations. Accessing a
/// released handle is a fatal programming error.
pub struct ThreadTable {
    slots: [Option<Thread>; MAX_THREADS],
}

impl ThreadTable {
    pub fn new() -> Self {
        const EMPTY: Option<Thread> = None;
        Self {
            slots: [EMPTY; MAX_THREADS],
        }
    }

    /// Allocate a control block with the default estimator policy.
    pub fn allocate(
        &mut self,
        priority: i32,
        user: Option<UserSpaceId>,
    ) -> Result<ThreadId, SpawnError> {
        self.allocate_with_estimator(priority, user, estimate::exponential_average)
    }

    /// Allocate a control block with an explicit estimator policy.
    pub fn allocate_with_estimator(
        &mut self,
        priority: i32,
        user: Option<UserSpaceId>,
        estimator: BurstFn,
    ) -> Result<ThreadId, SpawnError> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                let id = ThreadId(index);
                *slot = Some(Thread::with_estimator(id, priority, user, estimator));
                return Ok(id);
            }
        }
        Err(SpawnError::TableFull)
    }

    /// True if `id` refers to a live (unreleased) thread.
    #[inline]
    pub fn is_live(&self, id: ThreadId) -> bool {
        id.0 < MAX_THREADS && self.slots[id.0].is_some()
    }

    /// Borrow a live thread. Fatal on a released handle.
    pub fn get(&self, id: ThreadId) -> &Thread {
        match self.slots[id.0].as_ref() {
            Some(thread) => thread,
            None => panic!("use of released thread handle {}", id),
        }
    }

    /// Mutably borrow a live thread. Fatal on a released handle.
    pub fn get_mut(&mut self, id: ThreadId) -> &mut Thread {
        match self.slots[id.0].as_mut() {
            Some(thread) => thread,
            None => panic!("use of released thread handle {}", id),
        }
    }

    /// Release a thread's slot, ending its lifetime. The caller must hold
    /// no queue membership for `id` and control must already have left the
    /// thread's stack (see the deferred-destruction path).
    pub fn release(&mut self, id: ThreadId) {
        assert!(self.is_live(id), "double release of thread handle {}", id);
        self.slots[id.0] = None;
    }

    /// Number of live threads.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl Default for ThreadTable {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
