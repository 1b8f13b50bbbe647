//! Clock sources for instruction time attribution
//!
//! Every source reports fractional seconds that never decrease between
//! successive calls on one thread. Resolution matters more than epoch:
//! values are only ever subtracted, so each source is free to pick its own
//! zero point.
//!
//! The wall clock is the portable default. The `tsc` cargo feature selects
//! the hardware cycle counter instead, scaled to seconds with a one-shot
//! calibration; on targets without a cycle counter it degrades to fixed
//! monotonic ticks rather than aborting the interpreter.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Increment used by the degraded tick source.
const TICK_SECS: f64 = 1e-9;

/// A monotonic time source read once per counted instruction fetch.
pub trait Clock {
    /// Current elapsed time in fractional seconds.
    fn now(&mut self) -> f64;
}

/// Wall-clock source: process-relative `Instant` converted to seconds.
#[derive(Debug)]
pub struct WallClock {
    anchor: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    #[inline]
    fn now(&mut self) -> f64 {
        self.anchor.elapsed().as_secs_f64()
    }
}

/// Degraded source: advances by a fixed epsilon on every read.
///
/// Used when the selected hardware facility is unavailable. Hit counts
/// stay exact; attributed times become fetch counts in disguise.
#[derive(Debug, Default)]
pub struct TickClock {
    ticks: f64,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for TickClock {
    #[inline]
    fn now(&mut self) -> f64 {
        self.ticks += TICK_SECS;
        self.ticks
    }
}

/// Cycle-counter source scaled to seconds (x86_64 `rdtsc`).
///
/// Calibrated once at construction against the wall clock. A failed
/// calibration degrades to tick behavior instead of reporting garbage.
#[cfg(target_arch = "x86_64")]
#[derive(Debug)]
pub struct CycleClock {
    base: u64,
    cycles_per_sec: f64,
    ticks: f64,
}

#[cfg(target_arch = "x86_64")]
impl CycleClock {
    pub fn new() -> Self {
        let cycles_per_sec = Self::calibrate();
        Self {
            base: read_tsc(),
            cycles_per_sec,
            ticks: 0.0,
        }
    }

    /// Estimate the counter frequency over a short spin interval.
    fn calibrate() -> f64 {
        let anchor = Instant::now();
        let c0 = read_tsc();
        while anchor.elapsed() < std::time::Duration::from_millis(2) {
            std::hint::spin_loop();
        }
        let cycles = read_tsc().wrapping_sub(c0);
        let secs = anchor.elapsed().as_secs_f64();
        let rate = cycles as f64 / secs;
        if rate.is_finite() && rate > 0.0 {
            rate
        } else {
            0.0
        }
    }
}

#[cfg(target_arch = "x86_64")]
impl Default for CycleClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "x86_64")]
impl Clock for CycleClock {
    #[inline]
    fn now(&mut self) -> f64 {
        if self.cycles_per_sec > 0.0 {
            read_tsc().wrapping_sub(self.base) as f64 / self.cycles_per_sec
        } else {
            self.ticks += TICK_SECS;
            self.ticks
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn read_tsc() -> u64 {
    // Serialization is deliberately omitted: a fenced read would cost more
    // than the dispatch step it is timing.
    unsafe { core::arch::x86_64::_rdtsc() }
}

/// Deterministic source for tests and replay.
///
/// The handle is cheaply cloneable; a test keeps one clone and hands the
/// other to the profiler, then scripts time between fetch events.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    t: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, t: f64) {
        self.t.set(t);
    }

    pub fn advance(&self, dt: f64) {
        self.t.set(self.t.get() + dt);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&mut self) -> f64 {
        self.t.get()
    }
}

/// Build-time selected clock source.
#[cfg(all(feature = "tsc", target_arch = "x86_64"))]
pub type DefaultClock = CycleClock;
#[cfg(all(feature = "tsc", not(target_arch = "x86_64")))]
pub type DefaultClock = TickClock;
#[cfg(not(feature = "tsc"))]
pub type DefaultClock = WallClock;

/// Construct the clock source selected at build time.
pub fn default_clock() -> DefaultClock {
    DefaultClock::new()
}
