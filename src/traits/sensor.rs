//! Magnetometer transport abstraction.
//!
//! The compass pipeline does not talk to hardware directly; it consumes a
//! `MagSensor` implementation provided by the firmware crate (I2C/SPI driver)
//! or, on boards without a magnetometer, the [`NullMag`] stand-in. A
//! [`MockMag`] with scripted readings is always available for host testing.

use nalgebra::Vector3;

/// A raw magnetometer sample, one signed ADC count per sensor axis.
pub type RawSample = Vector3<i16>;

/// Magnetometer transport error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No magnetometer fitted, or the transport has not been brought up
    Unavailable,
    /// Bus-level communication failure (NACK, timeout)
    Bus,
}

impl SensorError {
    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorError::Unavailable => "Unavailable",
            SensorError::Bus => "Bus",
        }
    }
}

/// Magnetometer sensor transport.
///
/// `read` returns the current sample in sensor frame. Errors are
/// per-tick and non-fatal: the pipeline leaves its state untouched and
/// retries on the next tick.
pub trait MagSensor {
    /// One-time sensor bring-up (mode registers, gain, data rate).
    fn init(&mut self) -> Result<(), SensorError>;

    /// Pull one raw sample from the sensor.
    fn read(&mut self) -> Result<RawSample, SensorError>;
}

/// No-op transport for boards without a magnetometer.
///
/// Lets the pipeline and calibration machine stay structurally identical
/// whether or not hardware is fitted: `init` succeeds so bring-up code needs
/// no special case, and every `read` reports [`SensorError::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMag;

impl MagSensor for NullMag {
    fn init(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    fn read(&mut self) -> Result<RawSample, SensorError> {
        Err(SensorError::Unavailable)
    }
}

/// Mock magnetometer for testing
///
/// Provides preset readings in sequence for testing the pipeline and
/// calibration machine without hardware. When the queue is empty the
/// default reading is returned indefinitely.
pub struct MockMag {
    /// Queue of readings to return
    readings: heapless::Deque<RawSample, 64>,

    /// Default reading when queue is empty
    default_reading: RawSample,

    /// When set, `read` fails with a bus error (for error-path testing)
    failing: bool,

    /// Whether `init` has been called
    initialized: bool,
}

impl MockMag {
    /// Create a new mock magnetometer that always returns the zero vector.
    pub fn with_default_reading() -> Self {
        Self {
            readings: heapless::Deque::new(),
            default_reading: RawSample::zeros(),
            failing: false,
            initialized: false,
        }
    }

    /// Create a mock magnetometer with a sequence of readings.
    pub fn with_readings(readings: &[RawSample]) -> Self {
        let mut deque = heapless::Deque::new();
        for reading in readings.iter().take(64) {
            let _ = deque.push_back(*reading);
        }

        Self {
            readings: deque,
            default_reading: RawSample::zeros(),
            failing: false,
            initialized: false,
        }
    }

    /// Set the default reading to return when the queue is empty.
    pub fn set_default_reading(&mut self, reading: RawSample) {
        self.default_reading = reading;
    }

    /// Push a new reading onto the queue.
    pub fn push_reading(&mut self, reading: RawSample) -> Result<(), RawSample> {
        self.readings.push_back(reading)
    }

    /// Make subsequent reads fail (or succeed again) with a bus error.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Whether `init` has been called.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl MagSensor for MockMag {
    fn init(&mut self) -> Result<(), SensorError> {
        self.initialized = true;
        Ok(())
    }

    fn read(&mut self) -> Result<RawSample, SensorError> {
        if self.failing {
            return Err(SensorError::Bus);
        }
        Ok(self
            .readings
            .pop_front()
            .unwrap_or(self.default_reading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_mag_init_succeeds_read_unavailable() {
        let mut mag = NullMag;
        assert!(mag.init().is_ok());
        assert_eq!(mag.read(), Err(SensorError::Unavailable));
    }

    #[test]
    fn mock_mag_returns_queued_then_default() {
        let mut mag = MockMag::with_readings(&[
            RawSample::new(1, 2, 3),
            RawSample::new(4, 5, 6),
        ]);
        mag.set_default_reading(RawSample::new(-1, -1, -1));

        assert_eq!(mag.read().unwrap(), RawSample::new(1, 2, 3));
        assert_eq!(mag.read().unwrap(), RawSample::new(4, 5, 6));
        assert_eq!(mag.read().unwrap(), RawSample::new(-1, -1, -1));
        assert_eq!(mag.read().unwrap(), RawSample::new(-1, -1, -1));
    }

    #[test]
    fn mock_mag_failing_reads() {
        let mut mag = MockMag::with_readings(&[RawSample::new(7, 8, 9)]);
        mag.set_failing(true);
        assert_eq!(mag.read(), Err(SensorError::Bus));

        // Queue is preserved across failures
        mag.set_failing(false);
        assert_eq!(mag.read().unwrap(), RawSample::new(7, 8, 9));
    }

    #[test]
    fn mock_mag_tracks_init() {
        let mut mag = MockMag::with_default_reading();
        assert!(!mag.is_initialized());
        mag.init().unwrap();
        assert!(mag.is_initialized());
    }

    #[test]
    fn sensor_error_as_str() {
        assert_eq!(SensorError::Unavailable.as_str(), "Unavailable");
        assert_eq!(SensorError::Bus.as_str(), "Bus");
    }
}
