//! # Kernel Shell
//!
//! Owns the pieces the scheduler operates on — the thread table, the
//! current-thread slot, and the machine port — and wires them together
//! into the lifecycle API an embedding kernel drives: spawn, yield,
//! finish, and the per-timer-tick bookkeeping.
//!
//! There is no global current-thread pointer: `Kernel` holds the slot and
//! threads it through every scheduler call.

use crate::port::Port;
use crate::scheduler::{Promotion, Scheduler};
use crate::thread::{SpawnError, ThreadId, ThreadStatus, ThreadTable, UserSpaceId};

/// The scheduler core plus everything it schedules.
pub struct Kernel<P: Port> {
    threads: ThreadTable,
    scheduler: Scheduler,
    /// The thread presently occupying the CPU.
    current: ThreadId,
    port: P,
}

impl<P: Port> Kernel<P> {
    /// Boot the kernel. The boot thread (the context `new` is called
    /// from) occupies the CPU at priority 0 with no user space.
    pub fn new(port: P) -> Self {
        let mut threads = ThreadTable::new();
        let boot = threads
            .allocate(0, None)
            .unwrap_or_else(|_| panic!("empty thread table cannot be full"));
        threads.get_mut(boot).set_status(ThreadStatus::Running);

        Self {
            threads,
            scheduler: Scheduler::new(),
            current: boot,
            port,
        }
    }

    /// The thread presently occupying the CPU.
    #[inline]
    pub fn current(&self) -> ThreadId {
        self.current
    }

    pub fn threads(&self) -> &ThreadTable {
        &self.threads
    }

    pub fn threads_mut(&mut self) -> &mut ThreadTable {
        &mut self.threads
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Create a thread and admit it to the ready set.
    pub fn spawn(
        &mut self,
        priority: i32,
        user: Option<UserSpaceId>,
    ) -> Result<ThreadId, SpawnError> {
        let id = self.threads.allocate(priority, user)?;
        self.scheduler
            .ready_to_run(&mut self.threads, &self.port, id);
        Ok(id)
    }

    /// Give up the CPU voluntarily. If another thread is ready, the
    /// caller is re-queued by its current priority band and the CPU is
    /// handed over; otherwise the caller simply keeps running.
    pub fn yield_now(&mut self) {
        let Some(next) =
            self.scheduler
                .find_next_to_run(&mut self.threads, &self.port, self.current)
        else {
            return;
        };
        let old = self.current;
        self.scheduler
            .ready_to_run(&mut self.threads, &self.port, old);
        self.scheduler
            .run(&mut self.threads, &mut self.port, &mut self.current, next, false);
    }

    /// Terminate the current thread and hand the CPU to a successor,
    /// which destroys it once the switch has left its stack. A kernel
    /// never finishes its last runnable thread; doing so is fatal.
    pub fn finish_current(&mut self) {
        self.threads
            .get_mut(self.current)
            .set_status(ThreadStatus::Terminated);
        let Some(next) =
            self.scheduler
                .find_next_to_run(&mut self.threads, &self.port, self.current)
        else {
            panic!("finishing thread {} with no runnable successor", self.current);
        };
        self.scheduler
            .run(&mut self.threads, &mut self.port, &mut self.current, next, true);
    }

    /// Per-timer-tick bookkeeping: charge one tick of CPU time to the
    /// running thread, credit one tick of waiting to every queued thread,
    /// then age the queues. The returned signal tells the timer whether a
    /// higher band just became non-empty and preemption is worth it.
    pub fn tick(&mut self) -> Promotion {
        self.threads.get_mut(self.current).charge_tick(1);
        self.scheduler
            .inc_tick_to_threads(&mut self.threads, &self.port, self.current, 1);
        self.scheduler.maintain_queues(&self.threads, &self.port)
    }

    /// Dump the ready set through the log facade.
    pub fn print(&self) {
        self.scheduler.print(&self.threads);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
