//! Hard-iron calibration state machine.
//!
//! While a session is collecting, the pilot rotates the vehicle through all
//! orientations and the machine tracks the per-axis extremes of the aligned
//! field vector. When the fixed window elapses, the hard-iron zero point is
//! the midpoint of each axis' extremes. A session that never reaches the
//! full window (power loss, reboot) publishes nothing.

use crate::traits::time::TimeSource;
use nalgebra::Vector3;

/// Calibration window length. The pilot has this long to rotate the vehicle
/// through all orientations.
pub const CALIBRATION_WINDOW_US: u32 = 30_000_000;

enum State {
    Idle,
    Collecting {
        /// Session start stamp from the wrapping microsecond clock
        started_us: u32,
        /// Per-axis running minimum of the aligned vector
        min: Vector3<i32>,
        /// Per-axis running maximum of the aligned vector
        max: Vector3<i32>,
    },
}

/// Timed min/max hard-iron calibration session.
///
/// Drive with [`MagCalibration::begin`] once and [`MagCalibration::step`]
/// every tick; `step` yields the new offset exactly once, when the window
/// closes.
pub struct MagCalibration {
    state: State,
}

impl MagCalibration {
    /// Create the machine in the idle state.
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Whether a session is currently collecting extremes.
    pub fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting { .. })
    }

    /// Start a session, seeding both extremes with this tick's aligned
    /// vector. Restarts the window if a session was already running.
    pub fn begin(&mut self, now_us: u32, seed: Vector3<i32>) {
        self.state = State::Collecting {
            started_us: now_us,
            min: seed,
            max: seed,
        };
    }

    /// Advance the session by one tick.
    ///
    /// Inside the window the aligned vector is folded into the running
    /// extremes and `None` is returned. Once the window has elapsed
    /// (wrap-safe comparison, so a clock wrap during the session is fine),
    /// the machine returns to idle and yields the per-axis offset
    /// `(min + max) / 2`. The division truncates toward zero, preserving
    /// the rounding consumers have always seen.
    ///
    /// Idle ticks return `None`.
    pub fn step<T: TimeSource>(
        &mut self,
        clock: &T,
        aligned: Vector3<i32>,
    ) -> Option<Vector3<i32>> {
        let State::Collecting { started_us, min, max } = &mut self.state else {
            return None;
        };

        if clock.elapsed_since(*started_us) < CALIBRATION_WINDOW_US {
            *min = min.zip_map(&aligned, i32::min);
            *max = max.zip_map(&aligned, i32::max);
            None
        } else {
            let offset = min.zip_map(max, |lo, hi| (lo + hi) / 2);
            self.state = State::Idle;
            Some(offset)
        }
    }
}

impl Default for MagCalibration {
    fn default() -> Self {
        Self::new()
    }
}
