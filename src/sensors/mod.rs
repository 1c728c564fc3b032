pub mod ds3231;

pub use ds3231::{
    Alarm,
    AlarmSlot,
    ControlFlags,
    DateTime,
    Ds3231Error,
    Field,
    SquareWaveFrequency,
    StatusFlags,
    Temperature,
    DS3231,
    DS3231_ADDR,
};
