//! Calibration progress indication.
//!
//! The compass signals calibration activity to the pilot through a
//! fire-and-forget indicator (an LED on the reference hardware): a sustained
//! on/off spanning sensor bring-up, and one toggle per tick while a
//! calibration session is collecting. The firmware crate maps this onto a
//! real LED; [`NullIndicator`] discards the signal and [`MockIndicator`]
//! records it for host tests.

/// Fire-and-forget progress signal sink.
pub trait ProgressIndicator {
    /// Drive the indicator to a sustained on/off state.
    fn set(&mut self, on: bool);

    /// Flip the indicator state (blink while calibrating).
    fn toggle(&mut self);
}

/// Indicator that discards all signals.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullIndicator;

impl ProgressIndicator for NullIndicator {
    fn set(&mut self, _on: bool) {}

    fn toggle(&mut self) {}
}

/// Mock indicator recording signals for host tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockIndicator {
    /// Current on/off state
    pub on: bool,
    /// Number of `set` calls observed
    pub set_count: u32,
    /// Number of `toggle` calls observed
    pub toggle_count: u32,
}

impl MockIndicator {
    /// Create a new mock indicator, off.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressIndicator for MockIndicator {
    fn set(&mut self, on: bool) {
        self.on = on;
        self.set_count += 1;
    }

    fn toggle(&mut self) {
        self.on = !self.on;
        self.toggle_count += 1;
    }
}
