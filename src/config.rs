//! # Scheduler Configuration
//!
//! Compile-time constants governing the scheduler core.
//! All limits are fixed at compile time — no dynamic allocation.

/// Maximum number of threads the table can hold simultaneously.
/// This bounds the thread arena and every per-band ready queue.
pub const MAX_THREADS: usize = 16;

/// Priority threshold for band 1 (the highest band). A thread with
/// `priority >= BAND1_PRIORITY` belongs in L1, where selection is
/// shortest-estimated-burst-first.
pub const BAND1_PRIORITY: i32 = 100;

/// Priority threshold for band 2. A thread with
/// `BAND2_PRIORITY <= priority < BAND1_PRIORITY` belongs in L2, where
/// selection is highest-priority-first. Anything below lands in L3 (FIFO).
pub const BAND2_PRIORITY: i32 = 50;

/// Guard word stamped into every thread control block at creation.
/// `Thread::check_overflow` treats any other value as a fatal stack
/// overflow. The embedding port is expected to mirror this word at the
/// bottom of the thread's real stack.
pub const STACK_CANARY: u32 = 0x57AC_CAFE;

/// Predicted length of a brand-new thread's first CPU burst, in ticks.
/// Zero ranks fresh threads ahead of established ones in band 1 until
/// the estimator accumulates history.
pub const INITIAL_BURST_ESTIMATE: u32 = 0;
