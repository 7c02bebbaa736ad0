//! Fixed-tick scheduling
//!
//! The simulation advances in fixed ticks while rendering runs at whatever
//! rate the platform sustains. `InterpLoop` turns wall-clock time into a
//! stream of Tick/Frame events and exposes the blend fraction the renderer
//! uses to smooth positions between discrete simulation steps.

pub mod clock;
pub mod interp_loop;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;
pub use interp_loop::{InterpLoop, LoopConfig, LoopEvent};
