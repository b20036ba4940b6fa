//! # mlfq — Multi-Level Feedback-Queue Scheduler Core
//!
//! A preemptible MLFQ thread scheduler for a single-processor kernel:
//! it decides which ready thread runs next, migrates threads between
//! priority bands as they age, and orchestrates the handoff of the CPU
//! from one thread to another — including the deferred cleanup of a
//! thread that is terminating while still executing on its own stack.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                  Embedding Kernel                       │
//! │        timer ISR · thread bodies · memory layer        │
//! ├────────────────────────────────────────────────────────┤
//! │               Kernel Shell (kernel.rs)                  │
//! │    spawn() · yield_now() · finish_current() · tick()   │
//! ├──────────────────────────┬─────────────────────────────┤
//! │  Scheduler               │  Leveled Ready Queues       │
//! │  scheduler.rs            │  queue.rs                   │
//! │  ─ ready_to_run()        │  ─ L1: shortest burst       │
//! │  ─ find_next_to_run()    │  ─ L2: highest priority     │
//! │  ─ run() · maintain()    │  ─ L3: FIFO                 │
//! ├──────────────────────────┴─────────────────────────────┤
//! │              Thread Model (thread.rs)                   │
//! │   ThreadTable arena · TCB · status · burst estimate    │
//! ├────────────────────────────────────────────────────────┤
//! │               Machine Port (port.rs)                    │
//! │   interrupt level · ticks · SWITCH · user state        │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Bands
//!
//! The ready set is partitioned by priority into three bands, re-evaluated
//! on every aging pass:
//!
//! | Band | Priority | Discipline |
//! |------|----------|------------|
//! | L1 | `>= 100` | shortest estimated burst first |
//! | L2 | `50..=99` | highest priority first |
//! | L3 | `< 50` | first in, first out |
//!
//! `maintain_queues` runs once per timer tick and promotes any thread
//! whose priority has crossed a band boundary; its return signal lets the
//! timer preempt the running thread when a higher band just filled.
//!
//! ## Concurrency Model
//!
//! The core assumes a uniprocessor with interrupts masked by the caller
//! for the full duration of every operation — that discipline is the
//! entire synchronization mechanism, so there are no locks (blocking in
//! the scheduler could recurse back into selection). The one suspension
//! point is the context-switch call inside `run`, modeled as a
//! coroutine-style handoff behind the [`port::Port`] trait.
//!
//! ## Memory Model
//!
//! - **No heap**: all state is statically sized
//! - **No `alloc`**: pure `core` plus the `log` facade
//! - **Handle-based arena**: queues hold `ThreadId` indices into a fixed
//!   `ThreadTable`, so a destroyed thread can never dangle

#![no_std]

pub mod config;
pub mod estimate;
pub mod kernel;
pub mod port;
pub mod queue;
pub mod scheduler;
pub mod thread;
