//! # Machine Port
//!
//! The boundary between the scheduler core and the machine: interrupt
//! masking, the tick counter, the hardware context switch, and the save
//! and restore of user-mode state. The embedding kernel implements
//! [`Port`] for its architecture (e.g. a PendSV-style switch on Cortex-M);
//! the core never touches hardware directly.

use crate::thread::ThreadId;

/// Interrupt mask level as observed by the scheduler.
///
/// Every scheduler operation requires `Off` on entry: with interrupts
/// masked on a uniprocessor the core has mutual exclusion for free, which
/// is why it carries no locks (waiting on a lock here could recurse back
/// into selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptLevel {
    /// Asynchronous interrupts are masked.
    Off,
    /// Asynchronous interrupts are enabled.
    On,
}

/// Machine-side collaborator of the scheduler core.
pub trait Port {
    /// Current interrupt mask level. Scheduler operations abort if this
    /// reads [`InterruptLevel::On`] on entry.
    fn interrupt_level(&self) -> InterruptLevel;

    /// Monotonic tick counter, stamped into scheduler event records.
    fn total_ticks(&self) -> u64;

    /// Transfer the CPU from `old`'s execution context to `next`'s.
    ///
    /// This is the single suspension point in the core. The call
    /// conceptually suspends the caller mid-`run` and returns only when a
    /// later dispatch switches back to `old` — a two-sided coroutine
    /// handoff, not a normal call/return. Interrupts must be masked again
    /// by the time control comes back.
    fn switch_context(&mut self, old: ThreadId, next: ThreadId);

    /// Save `thread`'s user-visible registers and address-space state.
    /// Called just before the switch for threads that own a user space.
    fn save_user_state(&mut self, thread: ThreadId);

    /// Restore `thread`'s saved user-visible registers and address-space
    /// state. Called after the thread resumes from a switch.
    fn restore_user_state(&mut self, thread: ThreadId);

    /// Tear down machine-side resources (stack, address space) of a
    /// destroyed thread. Called on the deferred-destruction path, after
    /// control has fully left the thread's stack.
    fn release_thread(&mut self, thread: ThreadId);
}

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------
