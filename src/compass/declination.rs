//! Runtime declination derivation.
//!
//! The stored setting packs degrees and minutes of arc into one integer as
//! `degrees*100 + minutes`, so `1230` reads as 12°30'. The runtime value is
//! in heading units of 0.1°, ready to be added to a magnetic heading by the
//! attitude code.

/// Derive the runtime heading correction from the stored setting.
///
/// Returns `(degrees + minutes/60) * 10` in 0.1° units, or exactly `0.0`
/// when no magnetometer is present (a stale stored declination must not leak
/// into the heading when there is no magnetic heading to correct).
///
/// Decoding truncates toward zero for both degrees and minutes, so western
/// (negative) settings decode symmetrically: `-1230` yields `-125.0`.
pub fn runtime_declination(setting: i16, mag_present: bool) -> f32 {
    if !mag_present {
        return 0.0;
    }

    let deg = setting / 100;
    let min = setting % 100;

    (deg as f32 + min as f32 * (1.0 / 60.0)) * 10.0
}
