//! compass_core - Magnetometer heading reference for small autopilots
//!
//! This crate contains the platform-agnostic compass pipeline: raw sample
//! acquisition through a sensor trait, board-frame alignment, hard-iron
//! offset correction, a timed hard-iron calibration state machine, and
//! conversion of a stored declination setting into a runtime heading
//! correction. It can be tested on host without any hardware dependencies.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Platform services (sensor transport, clock,
//!   board alignment, progress indication) injected via traits, with mock
//!   implementations always available for host testing
//! - **No hidden state**: All per-tick state lives in the [`compass::Compass`]
//!   object passed through the control loop
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (clock, sensor
//!   transport, board alignment, progress indicator)
//! - [`parameters`]: Parameter store and the compass parameter block
//! - [`compass`]: Reading pipeline, calibration state machine, declination
//!
//! # Example
//!
//! ```
//! use compass_core::compass::Compass;
//! use compass_core::parameters::CompassParams;
//! use compass_core::traits::{IdentityAlignment, MockClock, MockMag, NullIndicator};
//!
//! let params = CompassParams::default();
//! let clock = MockClock::new();
//! let mut compass = Compass::new(
//!     MockMag::with_default_reading(),
//!     IdentityAlignment,
//!     NullIndicator,
//!     true,
//!     &params,
//! );
//! compass.init().unwrap();
//! let field = compass.update(&clock).unwrap();
//! assert_eq!(field, nalgebra::Vector3::zeros());
//! ```

#![no_std]

pub mod compass;
pub mod parameters;
pub mod traits;
