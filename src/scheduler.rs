//! # Scheduler
//!
//! The multi-level feedback-queue core: admission, selection, dispatch,
//! aging, per-tick wait accounting, and deferred destruction.
//!
//! ## Selection Disciplines
//!
//! Bands are drained in strict order, each with its own rule:
//!
//! | Band | Rule | Tie break |
//! |------|------|-----------|
//! | L1 | smallest `execution_estimate` | earliest inserted |
//! | L2 | largest `priority` | earliest inserted |
//! | L3 | FIFO | — |
//!
//! ## Concurrency Model
//!
//! Every operation requires interrupts masked on entry (asserted through
//! the port) and holds them for its full duration; on a uniprocessor that
//! is the entire mutual-exclusion story, so the core carries no locks —
//! blocking on a lock here could recurse straight back into selection.
//! The only suspension point in the whole core is the context-switch call
//! inside [`Scheduler::run`].
//!
//! ## Deferred Destruction
//!
//! A finishing thread is still executing on its own stack when it calls
//! `run`, so it cannot be freed there. It is parked in a single-entry
//! pending-destruction slot and released by the successor, right after the
//! switch has moved control off the dead thread's stack.

use crate::port::{InterruptLevel, Port};
use crate::queue::{Band, LeveledQueues};
use crate::thread::{ThreadId, ThreadStatus, ThreadTable};
use log::{debug, info};

// ---------------------------------------------------------------------------
// Aging signal
// ---------------------------------------------------------------------------

/// Outcome of an aging pass, consumed by the external timer to decide
/// whether the running thread should be preempted in favor of a
/// newly-available higher band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Promotion {
    /// No thread crossed a band boundary.
    None = 0,
    /// At least one thread was promoted into band 1.
    IntoBand1 = 1,
    /// At least one thread was promoted into band 2 (and none into band 1).
    IntoBand2 = 2,
}

impl Promotion {
    /// The raw signal value: 1 for a band-1 arrival, 2 for band-2, else 0.
    #[inline]
    pub fn signal(self) -> u8 {
        self as u8
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// The feedback scheduler. Owns the three-band ready set, the
/// pending-destruction slot, and the membership dirty flag.
///
/// Thread storage and the current-thread slot are owned by the caller
/// (see `Kernel`) and passed into every operation, so the scheduler holds
/// no ambient global state.
pub struct Scheduler {
    queues: LeveledQueues,
    /// At most one terminating thread, parked between its final `run` and
    /// the successor's cleanup. Occupied twice is a caller contract breach.
    to_be_destroyed: Option<ThreadId>,
    /// Set whenever queue membership changes; cleared by the external
    /// display via `set_dirty(false)`.
    dirty: bool,
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            queues: LeveledQueues::new(),
            to_be_destroyed: None,
            dirty: false,
        }
    }

    #[inline]
    fn assert_interrupts_off<P: Port>(port: &P) {
        assert_eq!(
            port.interrupt_level(),
            InterruptLevel::Off,
            "scheduler entered with interrupts enabled"
        );
    }

    /// Read-only view of the ready set.
    pub fn queues(&self) -> &LeveledQueues {
        &self.queues
    }

    /// The thread parked for deferred destruction, if any.
    pub fn pending_destruction(&self) -> Option<ThreadId> {
        self.to_be_destroyed
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    // -----------------------------------------------------------------------
    // Admission
    // -----------------------------------------------------------------------

    /// Mark `id` ready and queue it in the band matching its current
    /// priority.
    pub fn ready_to_run<P: Port>(&mut self, threads: &mut ThreadTable, port: &P, id: ThreadId) {
        Self::assert_interrupts_off(port);

        let thread = threads.get_mut(id);
        thread.set_status(ThreadStatus::Ready);
        let band = thread.band();

        debug!(
            target: "mlfq",
            "tick {}: thread {} is inserting into queue {}",
            port.total_ticks(),
            id,
            band
        );

        self.queues.insert(id, band);
        self.dirty = true;
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Pick the next thread to run and remove it from its queue, or
    /// return `None` if all bands are empty (the processor should idle).
    ///
    /// When a candidate exists, the thread in `current` first has its
    /// just-finished quantum closed out: burst estimate recomputed through
    /// its policy, last burst recorded, used time zeroed.
    pub fn find_next_to_run<P: Port>(
        &mut self,
        threads: &mut ThreadTable,
        port: &P,
        current: ThreadId,
    ) -> Option<ThreadId> {
        Self::assert_interrupts_off(port);

        if self.queues.is_empty_all() {
            return None;
        }

        threads.get_mut(current).close_quantum();

        let (band, id) = self
            .find_next_l1(threads)
            .map(|id| (Band::L1, id))
            .or_else(|| self.find_next_l2(threads).map(|id| (Band::L2, id)))
            .or_else(|| self.queues.band(Band::L3).front().map(|id| (Band::L3, id)))?;

        self.queues.band_mut(band).remove(id);
        self.dirty = true;

        debug!(
            target: "mlfq",
            "tick {}: thread {} is removed from queue {}",
            port.total_ticks(),
            id,
            band
        );

        Some(id)
    }

    /// Band 1: smallest execution estimate; a strict `<` keeps the
    /// earliest-inserted winner on ties.
    fn find_next_l1(&self, threads: &ThreadTable) -> Option<ThreadId> {
        let mut best: Option<(ThreadId, u32)> = None;
        for id in self.queues.band(Band::L1).iter() {
            let estimate = threads.get(id).execution_estimate();
            match best {
                Some((_, shortest)) if estimate >= shortest => {}
                _ => best = Some((id, estimate)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Band 2: largest priority; a strict `>` keeps the earliest-inserted
    /// winner on ties.
    fn find_next_l2(&self, threads: &ThreadTable) -> Option<ThreadId> {
        let mut best: Option<(ThreadId, i32)> = None;
        for id in self.queues.band(Band::L2).iter() {
            let priority = threads.get(id).priority();
            match best {
                Some((_, highest)) if priority <= highest => {}
                _ => best = Some((id, priority)),
            }
        }
        best.map(|(id, _)| id)
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Hand the CPU from the thread in `current` to `next`.
    ///
    /// The caller has already set the outgoing thread's status (ready,
    /// blocked, or terminated) and, unless it is finishing, re-queued it.
    /// With `finishing` set, the outgoing thread is parked in the
    /// pending-destruction slot — it is still executing on its own stack
    /// and can only be freed by its successor.
    ///
    /// The port's `switch_context` is the single suspension point: it
    /// returns only when a later dispatch switches back to the outgoing
    /// thread. On resumption this function cleans up any thread parked
    /// for destruction and restores the resumed thread's user state.
    pub fn run<P: Port>(
        &mut self,
        threads: &mut ThreadTable,
        port: &mut P,
        current: &mut ThreadId,
        next: ThreadId,
        finishing: bool,
    ) {
        Self::assert_interrupts_off(port);

        let old = *current;

        debug!(
            target: "mlfq",
            "tick {}: thread {} is now selected for execution",
            port.total_ticks(),
            next
        );
        debug!(
            target: "mlfq",
            "tick {}: thread {} is replaced, and it has executed {}",
            port.total_ticks(),
            old,
            threads.get(old).last_burst()
        );

        if finishing {
            assert!(
                self.to_be_destroyed.is_none(),
                "pending-destruction slot already occupied"
            );
            self.to_be_destroyed = Some(old);
        }

        if threads.get(old).has_user_space() {
            port.save_user_state(old);
        }

        // Last chance to catch a stack overrun before the dead stack is
        // switched away from.
        threads.get(old).check_overflow();

        *current = next;
        threads.get_mut(next).set_status(ThreadStatus::Running);

        port.switch_context(old, next);

        // Back on `old`'s stack, possibly much later. Interrupts must be
        // masked again before the port returns control here.
        Self::assert_interrupts_off(port);

        self.check_to_be_destroyed(threads, port);

        if threads.is_live(old) && threads.get(old).has_user_space() {
            port.restore_user_state(old);
        }
    }

    // -----------------------------------------------------------------------
    // Aging
    // -----------------------------------------------------------------------

    /// Promote threads whose priority has crossed a band boundary since
    /// their last placement. Band 3 is scanned first, then band 2
    /// including the fresh arrivals, so a thread can move 3 → 2 → 1 within
    /// one pass; promotion never moves a thread backward.
    pub fn maintain_queues<P: Port>(&mut self, threads: &ThreadTable, port: &P) -> Promotion {
        Self::assert_interrupts_off(port);

        let into_l2 = self.promote_band(threads, port, Band::L3, Band::L2);
        let into_l1 = self.promote_band(threads, port, Band::L2, Band::L1);

        if into_l1 {
            Promotion::IntoBand1
        } else if into_l2 {
            Promotion::IntoBand2
        } else {
            Promotion::None
        }
    }

    /// Move every thread in `from` whose priority now maps at or above
    /// `to` into `to`, preserving relative order. Returns true if
    /// anything moved.
    fn promote_band<P: Port>(
        &mut self,
        threads: &ThreadTable,
        port: &P,
        from: Band,
        to: Band,
    ) -> bool {
        let mut promoted = false;
        let mut index = 0;
        while index < self.queues.band(from).len() {
            let id = self.queues.band(from).at(index);
            let band = threads.get(id).band();
            let crosses = match to {
                Band::L1 => band == Band::L1,
                Band::L2 => band == Band::L2 || band == Band::L1,
                Band::L3 => false,
            };
            if crosses {
                self.queues.band_mut(from).remove(id);
                self.queues.band_mut(to).push_back(id);
                self.dirty = true;
                promoted = true;

                debug!(
                    target: "mlfq",
                    "tick {}: thread {} is removed from queue {}",
                    port.total_ticks(),
                    id,
                    from
                );
                debug!(
                    target: "mlfq",
                    "tick {}: thread {} is inserting into queue {}",
                    port.total_ticks(),
                    id,
                    to
                );
            } else {
                index += 1;
            }
        }
        promoted
    }

    // -----------------------------------------------------------------------
    // Per-tick accounting
    // -----------------------------------------------------------------------

    /// Credit one tick of waiting to every queued thread except the one
    /// in `current`.
    ///
    /// The `amount` parameter is accepted but the increment is always a
    /// single tick — a fixed contract of this interface, kept regardless
    /// of the argument.
    pub fn inc_tick_to_threads<P: Port>(
        &self,
        threads: &mut ThreadTable,
        port: &P,
        current: ThreadId,
        _amount: u32,
    ) {
        Self::assert_interrupts_off(port);

        for band in Band::ALL {
            for index in 0..self.queues.band(band).len() {
                let id = self.queues.band(band).at(index);
                if id != current {
                    threads.get_mut(id).increment_wait_ticks(1);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Deferred destruction
    // -----------------------------------------------------------------------

    /// Free the thread parked for destruction, if any. Only safe once the
    /// dispatch boundary has moved control off that thread's stack, which
    /// is why `run` calls this right after the switch returns.
    pub fn check_to_be_destroyed<P: Port>(&mut self, threads: &mut ThreadTable, port: &mut P) {
        Self::assert_interrupts_off(port);

        if let Some(id) = self.to_be_destroyed.take() {
            debug!(target: "mlfq", "tick {}: thread {} is destroyed", port.total_ticks(), id);
            port.release_thread(id);
            threads.release(id);
        }
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// Dump the contents of all three bands through the log facade.
    /// Strictly read-only.
    pub fn print(&self, threads: &ThreadTable) {
        info!(target: "mlfq", "ready queue contents:");
        for band in Band::ALL {
            info!(target: "mlfq", "{}:", band);
            for id in self.queues.band(band).iter() {
                let thread = threads.get(id);
                info!(
                    target: "mlfq",
                    "  thread {} priority {} estimate {} waited {}",
                    id,
                    thread.priority(),
                    thread.execution_estimate(),
                    thread.wait_ticks()
                );
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::testing::{FakePort, PortEvent};
    use crate::thread::UserSpaceId;

    /// Table with a boot thread occupying the CPU, mirroring how the
    /// kernel shell brings the scheduler up.
    fn boot() -> (Scheduler, ThreadTable, FakePort, ThreadId) {
        let mut table = ThreadTable::new();
        let boot = table.allocate(0, None).unwrap();
        table.get_mut(boot).set_status(ThreadStatus::Running);
        (Scheduler::new(), table, FakePort::new(), boot)
    }

    fn admit(
        sched: &mut Scheduler,
        table: &mut ThreadTable,
        port: &FakePort,
        priority: i32,
    ) -> ThreadId {
        let id = table.allocate(priority, None).unwrap();
        sched.ready_to_run(table, port, id);
        id
    }

    #[test]
    fn test_admission_lands_in_matching_band() {
        let (mut sched, mut table, port, _boot) = boot();

        let high = admit(&mut sched, &mut table, &port, 120);
        let mid = admit(&mut sched, &mut table, &port, 70);
        let low = admit(&mut sched, &mut table, &port, 10);

        assert_eq!(sched.queues().band_of(high), Some(Band::L1));
        assert_eq!(sched.queues().band_of(mid), Some(Band::L2));
        assert_eq!(sched.queues().band_of(low), Some(Band::L3));
        assert_eq!(table.get(high).status(), ThreadStatus::Ready);
        assert!(sched.dirty());
    }

    #[test]
    fn test_selection_removes_atomically() {
        let (mut sched, mut table, port, boot) = boot();
        let id = admit(&mut sched, &mut table, &port, 70);

        let picked = sched.find_next_to_run(&mut table, &port, boot).unwrap();
        assert_eq!(picked, id);
        assert_eq!(sched.queues().band_of(picked), None);
    }

    #[test]
    fn test_empty_selection_is_idle_not_error() {
        let (mut sched, mut table, port, boot) = boot();
        assert_eq!(sched.find_next_to_run(&mut table, &port, boot), None);
        // The idle outcome must not close out the running quantum.
        assert_eq!(table.get(boot).last_burst(), 0);
    }

    #[test]
    fn test_band1_shortest_estimate_first() {
        let (mut sched, mut table, port, boot) = boot();
        let slow = admit(&mut sched, &mut table, &port, 110);
        let fast = admit(&mut sched, &mut table, &port, 105);
        table.get_mut(slow).set_execution_estimate(9);
        table.get_mut(fast).set_execution_estimate(2);

        assert_eq!(
            sched.find_next_to_run(&mut table, &port, boot),
            Some(fast)
        );
    }

    #[test]
    fn test_band1_tie_goes_to_earliest_inserted() {
        let (mut sched, mut table, port, boot) = boot();
        let first = admit(&mut sched, &mut table, &port, 110);
        let second = admit(&mut sched, &mut table, &port, 110);
        table.get_mut(first).set_execution_estimate(5);
        table.get_mut(second).set_execution_estimate(5);

        assert_eq!(
            sched.find_next_to_run(&mut table, &port, boot),
            Some(first)
        );
    }

    #[test]
    fn test_band2_highest_priority_first() {
        let (mut sched, mut table, port, boot) = boot();
        let lower = admit(&mut sched, &mut table, &port, 60);
        let higher = admit(&mut sched, &mut table, &port, 90);

        assert_eq!(
            sched.find_next_to_run(&mut table, &port, boot),
            Some(higher)
        );
        assert_eq!(sched.queues().band_of(lower), Some(Band::L2));
    }

    #[test]
    fn test_band3_is_strict_fifo() {
        let (mut sched, mut table, port, boot) = boot();
        let first = admit(&mut sched, &mut table, &port, 20);
        let second = admit(&mut sched, &mut table, &port, 40);

        assert_eq!(
            sched.find_next_to_run(&mut table, &port, boot),
            Some(first)
        );
        assert_eq!(
            sched.find_next_to_run(&mut table, &port, boot),
            Some(second)
        );
    }

    #[test]
    fn test_band_order_is_strict() {
        let (mut sched, mut table, port, boot) = boot();
        let low = admit(&mut sched, &mut table, &port, 10);
        let mid = admit(&mut sched, &mut table, &port, 70);
        let high = admit(&mut sched, &mut table, &port, 120);

        assert_eq!(sched.find_next_to_run(&mut table, &port, boot), Some(high));
        assert_eq!(sched.find_next_to_run(&mut table, &port, boot), Some(mid));
        assert_eq!(sched.find_next_to_run(&mut table, &port, boot), Some(low));
        assert_eq!(sched.find_next_to_run(&mut table, &port, boot), None);
    }

    #[test]
    fn test_selection_closes_out_current_quantum() {
        let (mut sched, mut table, port, boot) = boot();
        admit(&mut sched, &mut table, &port, 70);

        table.get_mut(boot).charge_tick(6);
        sched.find_next_to_run(&mut table, &port, boot).unwrap();

        let thread = table.get(boot);
        assert_eq!(thread.last_burst(), 6);
        assert_eq!(thread.used_ticks(), 0);
        assert_eq!(thread.execution_estimate(), 3);
    }

    // Scenario from the admission/selection contract: A(120), B(70, est 5),
    // C(70, est 3) admitted in order; then D(120) after A has run.
    #[test]
    fn test_mixed_band_scenario() {
        let (mut sched, mut table, port, boot) = boot();
        let a = admit(&mut sched, &mut table, &port, 120);
        let b = admit(&mut sched, &mut table, &port, 70);
        let c = admit(&mut sched, &mut table, &port, 70);
        table.get_mut(b).set_execution_estimate(5);
        table.get_mut(c).set_execution_estimate(3);

        // A is the only band-1 entry.
        assert_eq!(sched.find_next_to_run(&mut table, &port, boot), Some(a));

        // D refills band 1 and wins over band 2.
        let d = admit(&mut sched, &mut table, &port, 120);
        assert_eq!(sched.find_next_to_run(&mut table, &port, boot), Some(d));

        // B and C tie on priority in band 2: first inserted wins, the
        // burst estimates play no part here.
        assert_eq!(sched.find_next_to_run(&mut table, &port, boot), Some(b));
        assert_eq!(sched.find_next_to_run(&mut table, &port, boot), Some(c));
    }

    #[test]
    fn test_maintain_queues_without_boundary_crossing() {
        let (mut sched, mut table, port, _boot) = boot();
        admit(&mut sched, &mut table, &port, 10);
        admit(&mut sched, &mut table, &port, 70);
        sched.set_dirty(false);

        assert_eq!(sched.maintain_queues(&table, &port), Promotion::None);
        assert!(!sched.dirty());
    }

    #[test]
    fn test_promotion_into_band2() {
        let (mut sched, mut table, port, _boot) = boot();
        let id = admit(&mut sched, &mut table, &port, 10);

        // External aging raises the priority past the band-2 boundary.
        table.get_mut(id).set_priority(60);
        sched.set_dirty(false);

        assert_eq!(sched.maintain_queues(&table, &port), Promotion::IntoBand2);
        assert_eq!(sched.queues().band_of(id), Some(Band::L2));
        assert!(sched.dirty());
    }

    #[test]
    fn test_promotion_skips_straight_to_band1() {
        let (mut sched, mut table, port, _boot) = boot();
        let id = admit(&mut sched, &mut table, &port, 10);

        table.get_mut(id).set_priority(120);

        // One pass carries the thread 3 → 2 → 1; the signal reports the
        // band-1 arrival.
        assert_eq!(sched.maintain_queues(&table, &port), Promotion::IntoBand1);
        assert_eq!(sched.queues().band_of(id), Some(Band::L1));
    }

    #[test]
    fn test_promotion_from_band2_to_band1() {
        let (mut sched, mut table, port, _boot) = boot();
        let id = admit(&mut sched, &mut table, &port, 70);
        let stay = admit(&mut sched, &mut table, &port, 70);

        table.get_mut(id).set_priority(100);

        assert_eq!(sched.maintain_queues(&table, &port), Promotion::IntoBand1);
        assert_eq!(sched.queues().band_of(id), Some(Band::L1));
        assert_eq!(sched.queues().band_of(stay), Some(Band::L2));
    }

    #[test]
    fn test_promotion_signal_values() {
        assert_eq!(Promotion::None.signal(), 0);
        assert_eq!(Promotion::IntoBand1.signal(), 1);
        assert_eq!(Promotion::IntoBand2.signal(), 2);
    }

    #[test]
    fn test_wait_ticks_skip_current_and_ignore_amount() {
        let (mut sched, mut table, port, boot) = boot();
        let waiting = admit(&mut sched, &mut table, &port, 70);
        let also_waiting = admit(&mut sched, &mut table, &port, 10);

        // `amount` larger than one must still advance by a single tick.
        sched.inc_tick_to_threads(&mut table, &port, boot, 5);

        assert_eq!(table.get(waiting).wait_ticks(), 1);
        assert_eq!(table.get(also_waiting).wait_ticks(), 1);
        assert_eq!(table.get(boot).wait_ticks(), 0);
    }

    #[test]
    fn test_run_updates_current_and_status() {
        let (mut sched, mut table, mut port, boot) = boot();
        let next = admit(&mut sched, &mut table, &port, 70);
        let picked = sched.find_next_to_run(&mut table, &port, boot).unwrap();

        let mut current = boot;
        table.get_mut(boot).set_status(ThreadStatus::Ready);
        sched.run(&mut table, &mut port, &mut current, picked, false);

        assert_eq!(current, next);
        assert_eq!(table.get(next).status(), ThreadStatus::Running);
        assert_eq!(port.event(0), PortEvent::Switch(boot, next));
    }

    #[test]
    fn test_run_saves_and_restores_user_state_around_switch() {
        let (mut sched, mut table, mut port, _boot) = boot();

        // A user-mode thread takes the CPU, then hands it off.
        let user = table.allocate(70, Some(UserSpaceId(1))).unwrap();
        table.get_mut(user).set_status(ThreadStatus::Running);
        let next = admit(&mut sched, &mut table, &port, 70);

        let mut current = user;
        table.get_mut(user).set_status(ThreadStatus::Ready);
        sched.run(&mut table, &mut port, &mut current, next, false);

        assert_eq!(port.event(0), PortEvent::SaveUser(user));
        assert_eq!(port.event(1), PortEvent::Switch(user, next));
        assert_eq!(port.event(2), PortEvent::RestoreUser(user));
        assert_eq!(port.event_count(), 3);
    }

    #[test]
    fn test_kernel_thread_skips_user_state_hooks() {
        let (mut sched, mut table, mut port, boot) = boot();
        let next = admit(&mut sched, &mut table, &port, 70);

        let mut current = boot;
        table.get_mut(boot).set_status(ThreadStatus::Ready);
        sched.run(&mut table, &mut port, &mut current, next, false);

        assert_eq!(port.event(0), PortEvent::Switch(boot, next));
        assert_eq!(port.event_count(), 1);
    }

    #[test]
    fn test_finishing_destroys_outgoing_thread_not_successor() {
        let (mut sched, mut table, mut port, _boot) = boot();

        let dying = table.allocate(70, None).unwrap();
        table.get_mut(dying).set_status(ThreadStatus::Running);
        let successor = admit(&mut sched, &mut table, &port, 70);

        let mut current = dying;
        table.get_mut(dying).set_status(ThreadStatus::Terminated);
        sched.run(&mut table, &mut port, &mut current, successor, true);

        // The dispatch boundary has handed control back: the dead thread
        // is gone, exactly once, and the successor is untouched.
        assert!(!table.is_live(dying));
        assert!(table.is_live(successor));
        assert_eq!(sched.pending_destruction(), None);
        assert_eq!(port.event(0), PortEvent::Switch(dying, successor));
        assert_eq!(port.event(1), PortEvent::Release(dying));
    }

    #[test]
    fn test_check_to_be_destroyed_is_idempotent_when_empty() {
        let (mut sched, mut table, mut port, _boot) = boot();
        let before = table.live_count();

        sched.check_to_be_destroyed(&mut table, &mut port);

        assert_eq!(table.live_count(), before);
        assert_eq!(port.event_count(), 0);
    }

    #[test]
    #[should_panic(expected = "pending-destruction slot already occupied")]
    fn test_double_finishing_is_fatal() {
        let (mut sched, mut table, mut port, boot) = boot();
        let next = admit(&mut sched, &mut table, &port, 70);
        let stale = table.allocate(10, None).unwrap();

        // A second finishing request while the slot is occupied is a
        // caller contract breach.
        sched.to_be_destroyed = Some(stale);
        let mut current = boot;
        sched.run(&mut table, &mut port, &mut current, next, true);
    }

    #[test]
    #[should_panic(expected = "interrupts enabled")]
    fn test_interrupts_enabled_on_entry_is_fatal() {
        let (mut sched, mut table, mut port, _boot) = boot();
        let id = table.allocate(70, None).unwrap();
        port.level = InterruptLevel::On;
        sched.ready_to_run(&mut table, &mut port, id);
    }

    #[test]
    fn test_print_does_not_mutate() {
        let (mut sched, mut table, port, _boot) = boot();
        let a = admit(&mut sched, &mut table, &port, 120);
        let b = admit(&mut sched, &mut table, &port, 20);
        sched.set_dirty(false);

        sched.print(&table);

        assert_eq!(sched.queues().band_of(a), Some(Band::L1));
        assert_eq!(sched.queues().band_of(b), Some(Band::L3));
        assert!(!sched.dirty());
    }

    #[test]
    fn test_dirty_flag_handshake() {
        let (mut sched, mut table, port, _boot) = boot();
        assert!(!sched.dirty());

        admit(&mut sched, &mut table, &port, 70);
        assert!(sched.dirty());

        // The display observes and clears.
        sched.set_dirty(false);
        assert!(!sched.dirty());
    }
}
