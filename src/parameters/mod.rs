//! Parameter management types and utilities
//!
//! This module provides the parameter store used as configuration storage for
//! the compass: the hard-iron offsets written by calibration and the stored
//! declination setting. Durable persistence (flash/EEPROM drivers) lives in
//! the firmware crate; the store's dirty flag is the persistence request.

pub mod compass;
pub mod error;
pub mod storage;

pub use compass::{
    CompassParams, PARAM_MAG_DECL, PARAM_MAG_OFS_X, PARAM_MAG_OFS_Y, PARAM_MAG_OFS_Z,
};
pub use error::ParameterError;
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore};
pub use storage::{MAX_PARAMS, PARAM_NAME_LEN};
