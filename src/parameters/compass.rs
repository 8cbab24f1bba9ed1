//! Compass Parameter Definitions
//!
//! The active profile's compass block: per-axis hard-iron offsets written by
//! the calibration machine, and the stored declination setting.
//!
//! # Parameters
//!
//! - `MAG_OFS_X` / `MAG_OFS_Y` / `MAG_OFS_Z` - hard-iron zero point, in raw
//!   ADC counts, body frame
//! - `MAG_DECL` - local magnetic declination, encoded `degrees*100 + minutes`
//!   (e.g. 12°30' east is stored as `1230`, west declinations are negative)

use super::storage::{ParamFlags, ParamValue, ParameterStore};
use super::ParameterError;
use nalgebra::Vector3;

pub const PARAM_MAG_OFS_X: &str = "MAG_OFS_X";
pub const PARAM_MAG_OFS_Y: &str = "MAG_OFS_Y";
pub const PARAM_MAG_OFS_Z: &str = "MAG_OFS_Z";
pub const PARAM_MAG_DECL: &str = "MAG_DECL";

/// Compass configuration for the active profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompassParams {
    /// Hard-iron zero point, subtracted from aligned readings
    pub mag_zero: Vector3<i32>,
    /// Declination setting, `degrees*100 + minutes`
    pub mag_declination: i16,
}

impl Default for CompassParams {
    fn default() -> Self {
        Self {
            mag_zero: Vector3::zeros(),
            mag_declination: 0,
        }
    }
}

impl CompassParams {
    /// Register compass parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(PARAM_MAG_OFS_X, ParamValue::Int(0), ParamFlags::empty())?;
        store.register(PARAM_MAG_OFS_Y, ParamValue::Int(0), ParamFlags::empty())?;
        store.register(PARAM_MAG_OFS_Z, ParamValue::Int(0), ParamFlags::empty())?;
        store.register(PARAM_MAG_DECL, ParamValue::Int(0), ParamFlags::empty())?;
        Ok(())
    }

    /// Load compass configuration from the parameter store
    ///
    /// Unregistered or wrongly-typed parameters fall back to defaults.
    pub fn from_store(store: &ParameterStore) -> Self {
        let int_of = |name: &str| store.get(name).and_then(ParamValue::as_int).unwrap_or(0);

        Self {
            mag_zero: Vector3::new(
                int_of(PARAM_MAG_OFS_X),
                int_of(PARAM_MAG_OFS_Y),
                int_of(PARAM_MAG_OFS_Z),
            ),
            mag_declination: int_of(PARAM_MAG_DECL) as i16,
        }
    }

    /// Write freshly calibrated offsets back to the store
    ///
    /// Marks the store dirty, which requests durable persistence of the
    /// active profile's configuration.
    pub fn save_offsets(
        store: &mut ParameterStore,
        offset: Vector3<i32>,
    ) -> Result<(), ParameterError> {
        store.set(PARAM_MAG_OFS_X, ParamValue::Int(offset.x))?;
        store.set(PARAM_MAG_OFS_Y, ParamValue::Int(offset.y))?;
        store.set(PARAM_MAG_OFS_Z, ParamValue::Int(offset.z))?;
        Ok(())
    }
}
