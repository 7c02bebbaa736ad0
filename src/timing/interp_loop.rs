//! Interpolated fixed-tick loop
//!
//! Emits a stream of `Tick` and `Frame` events. Ticks advance the simulation
//! by exactly one fixed timestep and always win when both are due, so a
//! frame never renders state more than one tick stale. Elapsed wall time is
//! clamped per poll to `max_frame`, which bounds the catch-up burst after a
//! stall: the simulation falls behind real time instead of spiraling.
//!
//! Timestamps are virtual nanoseconds. The loop's only suspension point is
//! the clock sleep inside `next_event`.

use super::clock::{Clock, SystemClock, ONE_SEC_NS};

/// The two kinds of loop event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    /// Advance the simulation by one fixed timestep.
    Tick,
    /// Render one frame of the current simulation state.
    Frame,
}

/// Loop timing parameters, fixed at `start()`.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Fixed simulation timestep.
    pub tick_ns: u64,
    /// Target presentation interval.
    pub frame_ns: u64,
    /// Hard ceiling on wall time converted to catch-up work per poll.
    pub max_frame_ns: u64,
    /// Slack subtracted from the frame deadline when deciding whether
    /// another tick still fits before the frame is due.
    pub frame_margin_ns: u64,
}

impl LoopConfig {
    /// 60 Hz ticks and frames, three frames of catch-up, half a frame of margin.
    pub fn sixty_hz() -> Self {
        let frame_ns = ONE_SEC_NS / 60;
        Self {
            tick_ns: ONE_SEC_NS / 60,
            frame_ns,
            max_frame_ns: frame_ns * 3,
            frame_margin_ns: frame_ns / 2,
        }
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::sixty_hz()
    }
}

/// Interpolated scheduler: see module docs.
pub struct InterpLoop<C: Clock = SystemClock> {
    clock: C,
    config: LoopConfig,
    running: bool,
    /// Virtual loop time: wall time with per-poll clamping applied.
    loop_time: u64,
    /// Timestamp of the last committed tick.
    tick_time: u64,
    /// Timestamp of the last committed frame.
    frame_time: u64,
    /// Wall timestamp of the previous poll.
    last_poll: u64,
    frame_interp: f32,
}

impl InterpLoop<SystemClock> {
    pub fn new(config: LoopConfig) -> Self {
        Self::with_clock(SystemClock::new(), config)
    }
}

impl<C: Clock> InterpLoop<C> {
    pub fn with_clock(clock: C, config: LoopConfig) -> Self {
        assert!(config.tick_ns > 0 && config.frame_ns > 0, "zero loop period");
        Self {
            clock,
            config,
            running: false,
            loop_time: 0,
            tick_time: 0,
            frame_time: 0,
            last_poll: 0,
            frame_interp: 0.0,
        }
    }

    /// (Re)initialize all counters and begin emitting events.
    pub fn start(&mut self) {
        self.loop_time = 0;
        self.tick_time = 0;
        self.frame_time = 0;
        self.frame_interp = 0.0;
        self.last_poll = self.clock.now_ns();
        self.running = true;
    }

    /// Halt event emission. `start()` arms the loop again.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fixed timestep in seconds, for integration.
    pub fn tick_seconds(&self) -> f32 {
        self.config.tick_ns as f32 / ONE_SEC_NS as f32
    }

    /// Timestamp of the last committed tick (virtual ns).
    pub fn tick_time(&self) -> u64 {
        self.tick_time
    }

    /// Timestamp of the last committed frame (virtual ns). Frame handlers
    /// difference consecutive values to get their delta.
    pub fn frame_time(&self) -> u64 {
        self.frame_time
    }

    /// Fraction of the current tick interval elapsed at the most recent
    /// frame, in [0, 1]. Blend factor for rendering.
    pub fn frame_interp(&self) -> f32 {
        self.frame_interp
    }

    /// Fold elapsed wall time into loop time, clamped to `max_frame`.
    fn poll(&mut self) {
        let now = self.clock.now_ns();
        let raw = now.saturating_sub(self.last_poll);
        self.last_poll = now;
        self.loop_time += raw.min(self.config.max_frame_ns);
    }

    /// Block until the next event is due and return it.
    ///
    /// Panics if the loop was not started; that is a programmer error, not a
    /// recoverable condition.
    pub fn next_event(&mut self) -> LoopEvent {
        assert!(self.running, "InterpLoop::next_event called before start()");

        loop {
            self.poll();

            // Ticks have priority whenever one is due.
            let next_tick = self.tick_time + self.config.tick_ns;
            if self.loop_time >= next_tick {
                self.tick_time = next_tick;
                return LoopEvent::Tick;
            }

            let next_frame = self.frame_time + self.config.frame_ns;
            if next_tick + self.config.frame_margin_ns <= next_frame {
                // Another tick still fits before the frame deadline.
                self.clock.sleep_ns(next_tick - self.loop_time);
                continue;
            }

            if self.loop_time < next_frame {
                self.clock.sleep_ns(next_frame - self.loop_time);
                self.poll();
                // A tick may have come due while waiting out the frame.
                let due = self.tick_time + self.config.tick_ns;
                if self.loop_time >= due {
                    self.tick_time = due;
                    return LoopEvent::Tick;
                }
            }

            self.frame_time = next_frame;
            self.frame_interp = ((self.loop_time - self.tick_time) as f64
                / self.config.tick_ns as f64)
                .clamp(0.0, 1.0) as f32;
            return LoopEvent::Frame;
        }
    }
}
