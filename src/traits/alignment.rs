//! Board alignment abstraction.
//!
//! Sensors are rarely mounted with their axes matching the vehicle body
//! frame. The firmware crate provides a `BoardAlignment` implementation that
//! applies the fixed rotation/reflection for the board's mounting orientation;
//! this core only consumes it. [`IdentityAlignment`] covers boards whose
//! sensor frame already matches the body frame, and host tests.

use nalgebra::Vector3;

/// Fixed mapping from sensor-frame axes to vehicle body-frame axes.
///
/// Implementations must be pure and deterministic: the same input vector
/// always maps to the same output vector.
pub trait BoardAlignment {
    /// Rotate a sensor-frame vector into the body frame.
    fn align(&self, v: Vector3<i32>) -> Vector3<i32>;
}

/// Identity alignment for sensors mounted in the body frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityAlignment;

impl BoardAlignment for IdentityAlignment {
    fn align(&self, v: Vector3<i32>) -> Vector3<i32> {
        v
    }
}
