//! Compass pipeline: reading, hard-iron calibration, declination
//!
//! [`Compass`] is the single owned state object the control loop drives: one
//! [`Compass::update`] call per scheduler tick produces the board-aligned,
//! offset-corrected field vector consumed by the attitude stack. Hard-iron
//! calibration is a timed session run by [`MagCalibration`] inside the same
//! tick, and the stored declination setting is decoded on demand by
//! [`runtime_declination`].
//!
//! Everything here is single-threaded and runs to completion each tick; the
//! platform collaborators (sensor transport, board alignment, progress
//! indicator, clock) are injected via the [`crate::traits`] abstractions.

pub mod calibration;
pub mod declination;

pub use calibration::{MagCalibration, CALIBRATION_WINDOW_US};
pub use declination::runtime_declination;

use crate::parameters::CompassParams;
use crate::traits::alignment::BoardAlignment;
use crate::traits::indicator::ProgressIndicator;
use crate::traits::sensor::{MagSensor, SensorError};
use crate::traits::time::TimeSource;
use nalgebra::Vector3;

/// Magnetometer heading reference.
///
/// Owns the per-tick pipeline state: the working hard-iron offset, the
/// initialized flag gating offset application, the one-shot calibration
/// request, the calibration session, and the derived runtime declination.
///
/// # Degraded states
///
/// Neither degraded condition is an error: before [`Compass::init`]
/// completes, readings pass through uncorrected (the stored offset is not
/// yet trusted), and with no magnetometer present the declination collapses
/// to zero. Both resolve themselves when the precondition changes because
/// every tick re-evaluates from scratch.
pub struct Compass<S, A, P> {
    sensor: S,
    alignment: A,
    indicator: P,
    /// Set once `init` succeeds; offsets are applied only from then on
    initialized: bool,
    /// Runtime capability flag for the magnetometer subsystem
    mag_present: bool,
    /// Working copy of the hard-iron zero point
    mag_zero: Vector3<i32>,
    /// Freshly calibrated offsets awaiting persistence, handed over once
    pending_save: Option<Vector3<i32>>,
    /// One-shot calibration command, consumed on the next successful tick
    calibration_requested: bool,
    calibration: MagCalibration,
    /// Runtime declination in 0.1° heading units
    declination: f32,
}

impl<S, A, P> Compass<S, A, P>
where
    S: MagSensor,
    A: BoardAlignment,
    P: ProgressIndicator,
{
    /// Create a compass from the active profile's stored configuration.
    ///
    /// `mag_present` is the runtime capability flag; boards without a
    /// magnetometer pass `false` together with a
    /// [`crate::traits::NullMag`] transport.
    pub fn new(
        sensor: S,
        alignment: A,
        indicator: P,
        mag_present: bool,
        params: &CompassParams,
    ) -> Self {
        let mut compass = Self {
            sensor,
            alignment,
            indicator,
            initialized: false,
            mag_present,
            mag_zero: params.mag_zero,
            pending_save: None,
            calibration_requested: false,
            calibration: MagCalibration::new(),
            declination: 0.0,
        };
        compass.recalculate_declination(params.mag_declination);
        compass
    }

    /// One-time sensor bring-up.
    ///
    /// The indicator is held on for the duration of the transport init.
    /// Offsets are applied to readings only once this has succeeded.
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.indicator.set(true);
        let result = self.sensor.init();
        self.indicator.set(false);
        result?;
        self.initialized = true;
        Ok(())
    }

    /// Request a hard-iron calibration session.
    ///
    /// A one-shot command: it is consumed on the next successful tick, which
    /// zeroes the working offset and starts the 30 second collection window.
    /// Requesting again mid-session restarts the window.
    pub fn request_calibration(&mut self) {
        self.calibration_requested = true;
    }

    /// Run one tick of the reading pipeline.
    ///
    /// Pulls a raw sample, widens it, rotates it into the body frame,
    /// services the calibration machine, and returns the corrected field
    /// vector. On a transport error no state changes (a pending calibration
    /// request stays pending) and the error is passed up.
    pub fn update<T: TimeSource>(&mut self, clock: &T) -> Result<Vector3<i32>, SensorError> {
        let raw = self.sensor.read()?;
        let mut field = self.alignment.align(raw.map(i32::from));

        if self.calibration_requested {
            self.calibration_requested = false;
            // The old zero point would skew the collected extremes
            self.mag_zero = Vector3::zeros();
            self.calibration.begin(clock.now_us(), field);
        }

        if self.initialized {
            field -= self.mag_zero;
        }

        if self.calibration.is_collecting() {
            match self.calibration.step(clock, field) {
                Some(offset) => {
                    self.mag_zero = offset;
                    self.pending_save = Some(offset);
                }
                None => self.indicator.toggle(),
            }
        }

        Ok(field)
    }

    /// Take freshly calibrated offsets, if a session just completed.
    ///
    /// The caller writes them through
    /// [`CompassParams::save_offsets`], which marks the parameter store
    /// dirty and so requests durable persistence. Yields each result at
    /// most once.
    pub fn take_pending_save(&mut self) -> Option<Vector3<i32>> {
        self.pending_save.take()
    }

    /// Re-derive the runtime declination from the stored setting.
    ///
    /// Call after the setting changes in configuration or after the
    /// presence flag changes. With no magnetometer present the result is
    /// exactly zero regardless of the setting.
    pub fn recalculate_declination(&mut self, setting: i16) {
        self.declination = runtime_declination(setting, self.mag_present);
    }

    /// Current runtime declination in 0.1° heading units.
    pub fn declination(&self) -> f32 {
        self.declination
    }

    /// Update the magnetometer presence flag.
    ///
    /// Follow with [`Compass::recalculate_declination`] so the derived
    /// value tracks the new capability state.
    pub fn set_mag_present(&mut self, present: bool) {
        self.mag_present = present;
    }

    /// Whether the magnetometer subsystem is present.
    pub fn mag_present(&self) -> bool {
        self.mag_present
    }

    /// Whether sensor bring-up has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether a calibration session is collecting.
    pub fn is_calibrating(&self) -> bool {
        self.calibration.is_collecting()
    }

    /// Current working hard-iron zero point.
    pub fn mag_zero(&self) -> Vector3<i32> {
        self.mag_zero
    }

    /// The injected sensor transport (scripting hook for host tests).
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// The injected progress indicator.
    pub fn indicator(&self) -> &P {
        &self.indicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{CompassParams, ParameterStore};
    use crate::traits::alignment::IdentityAlignment;
    use crate::traits::indicator::MockIndicator;
    use crate::traits::sensor::{MockMag, NullMag, RawSample};
    use crate::traits::time::MockClock;

    const TICK_US: u32 = 100_000;

    fn compass_with(
        sensor: MockMag,
        params: &CompassParams,
    ) -> Compass<MockMag, IdentityAlignment, MockIndicator> {
        Compass::new(
            sensor,
            IdentityAlignment,
            MockIndicator::new(),
            true,
            params,
        )
    }

    #[test]
    fn readings_pass_through_before_init() {
        let clock = MockClock::new();
        let params = CompassParams {
            mag_zero: Vector3::new(10, 20, 30),
            mag_declination: 0,
        };
        let mut compass = compass_with(
            MockMag::with_readings(&[RawSample::new(100, 100, 100); 2]),
            &params,
        );

        // Not initialized: stored offset must not distort the reading
        let field = compass.update(&clock).unwrap();
        assert_eq!(field, Vector3::new(100, 100, 100));

        compass.init().unwrap();
        let field = compass.update(&clock).unwrap();
        assert_eq!(field, Vector3::new(90, 80, 70));
    }

    #[test]
    fn init_wraps_indicator_and_marks_ready() {
        let params = CompassParams::default();
        let mut compass = compass_with(MockMag::with_default_reading(), &params);

        assert!(!compass.is_initialized());
        compass.init().unwrap();
        assert!(compass.is_initialized());
        assert!(compass.sensor_mut().is_initialized());

        // On for bring-up, off afterwards
        assert_eq!(compass.indicator().set_count, 2);
        assert!(!compass.indicator().on);
    }

    #[test]
    fn calibration_window_yields_midpoint_offsets() {
        let clock = MockClock::new();
        let params = CompassParams::default();
        let mut sensor = MockMag::with_readings(&[
            RawSample::new(-100, -50, -20),
            RawSample::new(100, 60, 40),
        ]);
        sensor.set_default_reading(RawSample::zeros());
        let mut compass = compass_with(sensor, &params);
        compass.init().unwrap();

        compass.request_calibration();
        while compass.take_pending_save().is_none() {
            compass.update(&clock).unwrap();
            clock.advance(TICK_US);
            if clock.now_us() > 2 * CALIBRATION_WINDOW_US {
                panic!("calibration never completed");
            }
        }

        assert_eq!(compass.mag_zero(), Vector3::new(0, 5, 10));
        assert!(!compass.is_calibrating());

        // Offsets are applied from the tick after completion
        compass
            .sensor_mut()
            .push_reading(RawSample::new(10, 10, 10))
            .unwrap();
        let field = compass.update(&clock).unwrap();
        assert_eq!(field, Vector3::new(10, 5, 0));
    }

    #[test]
    fn pending_save_is_one_shot_and_persists_via_store() {
        let clock = MockClock::new();
        let mut store = ParameterStore::new();
        CompassParams::register_defaults(&mut store).unwrap();
        let params = CompassParams::from_store(&store);

        let mut compass = compass_with(MockMag::with_default_reading(), &params);
        compass.init().unwrap();
        compass.request_calibration();

        compass.update(&clock).unwrap();
        clock.advance(CALIBRATION_WINDOW_US);
        compass.update(&clock).unwrap();

        let offset = compass.take_pending_save().expect("session completed");
        CompassParams::save_offsets(&mut store, offset).unwrap();
        assert!(store.is_dirty());
        assert_eq!(compass.take_pending_save(), None);
    }

    #[test]
    fn request_is_consumed_once_and_abandoned_session_publishes_nothing() {
        let clock = MockClock::new();
        let mut store = ParameterStore::new();
        CompassParams::register_defaults(&mut store).unwrap();
        CompassParams::save_offsets(&mut store, Vector3::new(5, 6, 7)).unwrap();
        store.clear_dirty();
        let params = CompassParams::from_store(&store);

        let mut compass = compass_with(MockMag::with_default_reading(), &params);
        compass.init().unwrap();

        compass.request_calibration();
        compass.update(&clock).unwrap();
        assert!(compass.is_calibrating());
        // Request was consumed on the first tick; working offset is zeroed
        assert_eq!(compass.mag_zero(), Vector3::zeros());

        // Simulate power loss mid-window: drop the compass, reload config
        clock.advance(10_000_000);
        compass.update(&clock).unwrap();
        drop(compass);

        let reloaded = CompassParams::from_store(&store);
        assert_eq!(reloaded.mag_zero, Vector3::new(5, 6, 7));
        assert!(!store.is_dirty());
    }

    #[test]
    fn failed_reads_leave_request_pending() {
        let clock = MockClock::new();
        let params = CompassParams::default();
        let mut compass = compass_with(MockMag::with_default_reading(), &params);
        compass.init().unwrap();

        compass.request_calibration();
        compass.sensor_mut().set_failing(true);
        assert_eq!(compass.update(&clock), Err(SensorError::Bus));
        assert!(!compass.is_calibrating());

        // First successful tick consumes the request
        compass.sensor_mut().set_failing(false);
        compass.update(&clock).unwrap();
        assert!(compass.is_calibrating());
    }

    #[test]
    fn indicator_toggles_once_per_collecting_tick() {
        let clock = MockClock::new();
        let params = CompassParams::default();
        let mut compass = compass_with(MockMag::with_default_reading(), &params);
        compass.init().unwrap();

        compass.update(&clock).unwrap();
        assert_eq!(compass.indicator().toggle_count, 0);

        compass.request_calibration();
        for _ in 0..5 {
            compass.update(&clock).unwrap();
            clock.advance(TICK_US);
        }
        assert_eq!(compass.indicator().toggle_count, 5);

        // The closing tick publishes instead of toggling
        clock.set(CALIBRATION_WINDOW_US);
        compass.update(&clock).unwrap();
        assert_eq!(compass.indicator().toggle_count, 5);
        assert!(compass.take_pending_save().is_some());
    }

    #[test]
    fn session_collects_pre_offset_vector() {
        let clock = MockClock::new();
        let params = CompassParams {
            mag_zero: Vector3::new(50, 50, 50),
            mag_declination: 0,
        };
        let mut sensor = MockMag::with_default_reading();
        sensor.set_default_reading(RawSample::new(30, 30, 30));
        let mut compass = compass_with(sensor, &params);
        compass.init().unwrap();

        // The stored offset is zeroed at session start, so the machine sees
        // the raw aligned value, not value-minus-50
        compass.request_calibration();
        compass.update(&clock).unwrap();
        clock.advance(CALIBRATION_WINDOW_US);
        compass.update(&clock).unwrap();

        assert_eq!(compass.take_pending_save(), Some(Vector3::new(30, 30, 30)));
    }

    #[test]
    fn null_transport_reports_unavailable() {
        let clock = MockClock::new();
        let params = CompassParams::default();
        let mut compass = Compass::new(
            NullMag,
            IdentityAlignment,
            MockIndicator::new(),
            false,
            &params,
        );

        compass.init().unwrap();
        assert_eq!(compass.update(&clock), Err(SensorError::Unavailable));
        assert_eq!(compass.declination(), 0.0);
    }

    #[test]
    fn declination_tracks_presence_and_setting() {
        let params = CompassParams {
            mag_zero: Vector3::zeros(),
            mag_declination: 1230,
        };
        let mut compass = compass_with(MockMag::with_default_reading(), &params);
        assert_eq!(compass.declination(), 125.0);

        // Bit-identical on recomputation with unchanged inputs
        let before = compass.declination().to_bits();
        compass.recalculate_declination(1230);
        assert_eq!(compass.declination().to_bits(), before);

        compass.set_mag_present(false);
        compass.recalculate_declination(1230);
        assert_eq!(compass.declination(), 0.0);
    }
}
