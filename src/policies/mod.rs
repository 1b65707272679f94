//! Restart timing policies.
//!
//! ## Contents
//! - [`BackoffPolicy`] how restart delays evolve (base / multiplier / max + jitter)
//! - [`JitterPolicy`]  randomization to avoid synchronized sibling restarts
//!
//! ## Quick wiring
//! ```text
//! SupervisorStrategy { backoff: BackoffPolicy, .. }
//!      └─► supervision engine, on a Restart decision:
//!           - delay = backoff.delay(retry_count)
//!           - every affected actor sleeps `delay` inside its own dispatch loop
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → base=100ms, multiplier=2.0, max=30s, jitter=None.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
