//! Time abstraction traits for platform-agnostic timing operations.
//!
//! This module provides the `TimeSource` trait that abstracts over different
//! time providers (hardware timer, mock, etc.) to enable host testing without
//! embedded dependencies. The clock is a wrapping 32-bit microsecond counter,
//! matching the free-running timers found on small controllers.

use core::cell::Cell;

/// Platform-agnostic time source for control loops and timing.
///
/// This trait abstracts over different time providers:
/// - A hardware timer wrapper (in the firmware crate) for embedded targets
/// - `MockClock` for host testing with controllable time
///
/// The counter wraps at `u32::MAX`; all elapsed-time arithmetic must go
/// through [`TimeSource::elapsed_since`], which is wrap-safe. Intervals are
/// therefore only meaningful while true elapsed time stays below the
/// counter's range (~71 minutes).
///
/// # Example
///
/// ```
/// use compass_core::traits::{TimeSource, MockClock};
///
/// fn due<T: TimeSource>(clock: &T, last_update_us: u32) -> bool {
///     clock.elapsed_since(last_update_us) >= 20_000 // 50Hz
/// }
///
/// let clock = MockClock::new();
/// assert!(!due(&clock, 0));
/// clock.advance(20_000);
/// assert!(due(&clock, 0));
/// ```
pub trait TimeSource: Clone + Send + Sync {
    /// Returns the current time in microseconds since system start.
    ///
    /// The value wraps around to zero after `u32::MAX` microseconds.
    fn now_us(&self) -> u32;

    /// Returns elapsed time in microseconds since a reference point.
    ///
    /// Uses wrapping subtraction, so the result is correct across a single
    /// counter wrap between `reference_us` and now.
    fn elapsed_since(&self, reference_us: u32) -> u32 {
        self.now_us().wrapping_sub(reference_us)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// This implementation allows tests to control time progression, enabling
/// deterministic testing of timing-dependent code, including counter wrap.
///
/// # Example
///
/// ```
/// use compass_core::traits::{MockClock, TimeSource};
///
/// let clock = MockClock::with_initial(u32::MAX);
/// clock.advance(1);
/// assert_eq!(clock.now_us(), 0);
/// assert_eq!(clock.elapsed_since(u32::MAX), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockClock {
    current_us: Cell<u32>,
}

// Safety: MockClock is only used in single-threaded test contexts where Cell
// is safe. The Send+Sync bounds on the TimeSource trait are required for
// embedded contexts, but MockClock is not used there.
unsafe impl Send for MockClock {}
unsafe impl Sync for MockClock {}

impl MockClock {
    /// Creates a new `MockClock` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a new `MockClock` starting at the specified time.
    pub fn with_initial(us: u32) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, us: u32) {
        self.current_us.set(us);
    }

    /// Advances the current time by the specified amount, wrapping at
    /// `u32::MAX` like the hardware counter it stands in for.
    pub fn advance(&self, us: u32) {
        self.current_us.set(self.current_us.get().wrapping_add(us));
    }
}

impl TimeSource for MockClock {
    fn now_us(&self) -> u32 {
        self.current_us.get()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
