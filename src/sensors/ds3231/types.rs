use std::fmt;

/// Wall clock time as kept by the DS3231.
///
/// - `year`: 2000 to 2199. Years from 2100 on are stored with the century bit.
/// - `week_day`: 1 to 7. The chip only increments it, the meaning of each value is up to the user.
/// - `hour`: Always 0 to 23, whatever hour mode the chip registers are in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub date: u8,
    pub week_day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02} {:02}:{:02}:{:02} (day {})",
               self.year, self.month, self.date, self.hour, self.minute, self.second, self.week_day)
    }
}

/// Match condition of one of the two alarms.
///
/// Every field set to `Some` must match the current time for the alarm to fire, fields set to
/// `None` match any value. `date` and `week_day` can not be set at the same time. `second` is
/// only used by `AlarmSlot::Alarm1`.
///
/// The default alarm matches every value, which for `AlarmSlot::Alarm1` means it fires once per
/// second and for `AlarmSlot::Alarm2` once per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alarm {
    pub date: Option<u8>,
    pub week_day: Option<u8>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
}

/// The two alarms of the DS3231. Only the first one has a seconds register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmSlot {
    Alarm1,
    Alarm2,
}

/// Frequency of the square wave output, selected by the RS2 and RS1 bits of the control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SquareWaveFrequency {
    #[default]
    Freq1Hz,
    Freq1024Hz,
    Freq4096Hz,
    Freq8192Hz,
}

impl SquareWaveFrequency {
    pub(crate) fn bits(self) -> u8 {
        match self {
            SquareWaveFrequency::Freq1Hz => 0b00,
            SquareWaveFrequency::Freq1024Hz => 0b01,
            SquareWaveFrequency::Freq4096Hz => 0b10,
            SquareWaveFrequency::Freq8192Hz => 0b11,
        }
    }

    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => SquareWaveFrequency::Freq1Hz,
            0b01 => SquareWaveFrequency::Freq1024Hz,
            0b10 => SquareWaveFrequency::Freq4096Hz,
            _ => SquareWaveFrequency::Freq8192Hz,
        }
    }
}

/// Contents of the control register (0x0E).
///
/// - `oscillator_disabled`: EOSC. Stops the oscillator while running from the battery.
/// - `battery_backed_square_wave`: BBSQW. Keeps the square wave running from the battery.
/// - `force_temperature_conversion`: CONV. Starts a temperature conversion right away.
/// - `square_wave_frequency`: RS2 and RS1.
/// - `interrupt_control_enabled`: INTCN. The INT/SQW pin signals alarms instead of the square wave.
/// - `alarm2_interrupt_enabled`: A2IE.
/// - `alarm1_interrupt_enabled`: A1IE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlFlags {
    pub oscillator_disabled: bool,
    pub battery_backed_square_wave: bool,
    pub force_temperature_conversion: bool,
    pub square_wave_frequency: SquareWaveFrequency,
    pub interrupt_control_enabled: bool,
    pub alarm2_interrupt_enabled: bool,
    pub alarm1_interrupt_enabled: bool,
}

/// Contents of the status register (0x0F).
///
/// - `oscillator_stop_flag`: OSF. The oscillator stopped at some point, the time may be wrong.
/// - `enable_32khz_output`: EN32kHz.
/// - `busy`: BSY. A temperature conversion is in progress.
/// - `alarm2_fired`: A2F.
/// - `alarm1_fired`: A1F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags {
    pub oscillator_stop_flag: bool,
    pub enable_32khz_output: bool,
    pub busy: bool,
    pub alarm2_fired: bool,
    pub alarm1_fired: bool,
}

/// Temperature reported by the DS3231, with a resolution of 0.25 °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Temperature {
    quarter_degrees: i16,
}

impl Temperature {
    pub const fn from_quarter_degrees(quarter_degrees: i16) -> Self {
        Temperature { quarter_degrees }
    }

    /// Temperature as a number of 0.25 °C steps.
    pub fn quarter_degrees(&self) -> i16 {
        self.quarter_degrees
    }

    pub fn celsius(&self) -> f32 {
        self.quarter_degrees as f32 / 4.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} °C", self.celsius())
    }
}
