use std::sync::atomic::{AtomicBool, Ordering};

/// Outputs that the buttons and the web server can switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Pump,
    /// Both LED channels, always switched together.
    Leds,
}

/// Enable state of the pump and the LEDs.
///
/// Button interrupts and HTTP handlers run in different contexts and both toggle and read
/// these flags, so every update is a single atomic operation. Driving the pins from the
/// returned state is up to the caller. Everything starts disabled.
#[derive(Debug, Default)]
pub struct OutputState {
    pump: AtomicBool,
    leds: AtomicBool,
}

impl OutputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, output: Output) -> &AtomicBool {
        match output {
            Output::Pump => &self.pump,
            Output::Leds => &self.leds,
        }
    }

    /// Flips the state of `output`.
    ///
    /// # Returns
    ///
    /// The new state, `true` meaning enabled.
    pub fn toggle(&self, output: Output) -> bool {
        let enabled = !self.flag(output).fetch_xor(true, Ordering::AcqRel);
        log::info!("{:?} {}", output, if enabled { "enabled" } else { "disabled" });
        enabled
    }

    pub fn is_enabled(&self, output: Output) -> bool {
        self.flag(output).load(Ordering::Acquire)
    }

    pub fn toggle_pump(&self) -> bool {
        self.toggle(Output::Pump)
    }

    pub fn toggle_leds(&self) -> bool {
        self.toggle(Output::Leds)
    }

    pub fn pump_enabled(&self) -> bool {
        self.is_enabled(Output::Pump)
    }

    pub fn leds_enabled(&self) -> bool {
        self.is_enabled(Output::Leds)
    }
}
