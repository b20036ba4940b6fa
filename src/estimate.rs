//! # Burst Estimation
//!
//! Policy for predicting the length of a thread's next CPU burst, used by
//! band-1 selection (shortest-estimated-burst-first).
//!
//! The estimator is pluggable: a thread carries a [`BurstFn`] chosen at
//! creation, and recomputes its own estimate when it closes out a quantum.
//! The default policy is [`exponential_average`], an exponential moving
//! average with α = 1/2 — deterministic, integer-only.

/// Burst-estimate policy: given the length of the just-finished quantum and
/// the previous estimate, produce the predicted length of the next burst.
///
/// Policies must be pure functions of their arguments so that selection
/// stays deterministic.
pub type BurstFn = fn(used: u32, previous: u32) -> u32;

/// Exponential moving average with α = 1/2:
///
/// ```text
/// estimate' = (used + estimate) / 2
/// ```
///
/// Recent behavior and accumulated history are weighted equally, so a
/// thread that alternates long and short bursts settles near the mean,
/// while a thread that turns CPU-bound sees its estimate (and thus its
/// band-1 ranking) degrade within a few quanta.
pub fn exponential_average(used: u32, previous: u32) -> u32 {
    ((used as u64 + previous as u64) / 2) as u32
}
