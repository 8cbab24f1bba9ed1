//! Core traits for platform-agnostic compass functionality.
//!
//! This module provides trait abstractions that decouple the compass
//! pipeline from platform-specific implementations (sensor drivers, board
//! alignment tables, LED indicators, hardware timers).
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Platform implementations live in the firmware crate

pub mod alignment;
pub mod indicator;
pub mod sensor;
pub mod time;

pub use alignment::{BoardAlignment, IdentityAlignment};
pub use indicator::{MockIndicator, NullIndicator, ProgressIndicator};
pub use sensor::{MagSensor, MockMag, NullMag, SensorError};
pub use time::{MockClock, TimeSource};
