//! Driver for the DS3231 real time clock.
//!
//! Every operation is a single bus transaction on one group of registers: `get_*` reads and
//! decodes, `set_*` encodes and writes. Nothing is cached, retried or split, so a date and
//! time is always written in one 7 byte transfer and can not be observed half updated.

pub mod registers;
mod types;

use std::fmt;

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::config::BoardConfig;

use registers::{ALARM_1_LEN, ALARM_2_LEN, DATE_TIME_LEN, TEMPERATURE_LEN};

pub use types::*;

pub const DS3231_ADDR: u8 = 0x68;

const DATE_TIME_REGISTER: u8 = 0x00;
const ALARM_1_REGISTER: u8 = 0x07;
const ALARM_2_REGISTER: u8 = 0x0B;
const CONTROL_REGISTER: u8 = 0x0E;
const STATUS_REGISTER: u8 = 0x0F;
const TEMPERATURE_REGISTER: u8 = 0x11;

/// Field of a `DateTime` or an `Alarm`, used to report which one was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    Month,
    Date,
    WeekDay,
    Hour,
    Minute,
    Second,
}

/// Error types related to DS3231 operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ds3231Error {
    CommunicationError(ErrorKind),
    OutOfRange { field: Field, value: u16 },
    ConflictingAlarmDay,
}

impl fmt::Display for Ds3231Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ds3231Error::CommunicationError(error) => write!(f, "communication with the DS3231 failed: {error:?}"),
            Ds3231Error::OutOfRange { field, value } => write!(f, "{value} is out of range for {field:?}"),
            Ds3231Error::ConflictingAlarmDay => write!(f, "an alarm can not match both a date and a week day"),
        }
    }
}

impl std::error::Error for Ds3231Error {}

/// DS3231 on an I2C bus.
///
/// The driver owns the bus for its whole life. If other devices share the same physical bus,
/// pass a handle that serializes the access, the driver does no locking of its own.
pub struct DS3231<I2C: I2c> {
    i2c: I2C,
    addr: u8,
}

impl <I2C: I2c>DS3231<I2C> {
    /// Creates a new DS3231 at its fixed address, 0x68.
    pub fn new(i2c: I2C) -> DS3231<I2C> {
        DS3231::with_address(i2c, DS3231_ADDR)
    }

    /// Creates a new DS3231 that answers on `addr`.
    pub fn with_address(i2c: I2C, addr: u8) -> DS3231<I2C> {
        DS3231 { i2c, addr }
    }

    /// Creates a new DS3231 at the address set in the board configuration.
    pub fn from_config(i2c: I2C, config: &BoardConfig) -> DS3231<I2C> {
        DS3231::with_address(i2c, config.ds3231_addr)
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Gives back the bus, dropping the driver.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_registers<const N: usize>(&mut self, register: u8) -> Result<[u8; N], Ds3231Error> {
        let mut buffer = [0_u8; N];
        log::trace!("DS3231 {:#04x}: reading {} bytes from register {:#04x}", self.addr, N, register);
        self.i2c.write_read(self.addr, &[register], &mut buffer).map_err(|error| {
            log::error!("DS3231 {:#04x}: read of register {:#04x} failed: {:?}", self.addr, register, error);
            Ds3231Error::CommunicationError(error.kind())
        })?;
        Ok(buffer)
    }

    /// Sends the register offset and `bytes` in one write, the longest group being the date and
    /// time.
    fn write_registers(&mut self, register: u8, bytes: &[u8]) -> Result<(), Ds3231Error> {
        let mut frame = [0_u8; DATE_TIME_LEN + 1];
        frame[0] = register;
        frame[1..=bytes.len()].copy_from_slice(bytes);
        log::trace!("DS3231 {:#04x}: writing {:02x?} to register {:#04x}", self.addr, bytes, register);
        self.i2c.write(self.addr, &frame[..=bytes.len()]).map_err(|error| {
            log::error!("DS3231 {:#04x}: write of register {:#04x} failed: {:?}", self.addr, register, error);
            Ds3231Error::CommunicationError(error.kind())
        })
    }

    /// Reads the current date and time.
    ///
    /// # Errors
    ///
    /// - `Ds3231Error::CommunicationError`: If the bus transfer fails.
    pub fn get_date_time(&mut self) -> Result<DateTime, Ds3231Error> {
        let buffer = self.read_registers::<DATE_TIME_LEN>(DATE_TIME_REGISTER)?;
        let date_time = registers::decode_date_time(&buffer);
        log::debug!("DS3231 time: {}", date_time);
        Ok(date_time)
    }

    /// Sets the date and time. The registers are left in 24 hour mode.
    ///
    /// # Errors
    ///
    /// - `Ds3231Error::OutOfRange`: If a field of `date_time` is out of range. Nothing is written.
    /// - `Ds3231Error::CommunicationError`: If the bus transfer fails.
    pub fn set_date_time(&mut self, date_time: &DateTime) -> Result<(), Ds3231Error> {
        let buffer = registers::encode_date_time(date_time)?;
        self.write_registers(DATE_TIME_REGISTER, &buffer)
    }

    /// Reads the match condition of one of the alarms.
    ///
    /// # Errors
    ///
    /// - `Ds3231Error::CommunicationError`: If the bus transfer fails.
    pub fn get_alarm(&mut self, slot: AlarmSlot) -> Result<Alarm, Ds3231Error> {
        let alarm = match slot {
            AlarmSlot::Alarm1 => registers::decode_alarm_1(&self.read_registers::<ALARM_1_LEN>(ALARM_1_REGISTER)?),
            AlarmSlot::Alarm2 => registers::decode_alarm_2(&self.read_registers::<ALARM_2_LEN>(ALARM_2_REGISTER)?),
        };
        log::debug!("DS3231 {:?}: {:?}", slot, alarm);
        Ok(alarm)
    }

    /// Sets the match condition of one of the alarms. `AlarmSlot::Alarm2` ignores `alarm.second`.
    ///
    /// This does not enable the alarm interrupt nor clear its flag, see `set_control` and
    /// `set_status`.
    ///
    /// # Errors
    ///
    /// - `Ds3231Error::ConflictingAlarmDay`: If both `date` and `week_day` are set.
    /// - `Ds3231Error::OutOfRange`: If a set field is out of range. Nothing is written.
    /// - `Ds3231Error::CommunicationError`: If the bus transfer fails.
    pub fn set_alarm(&mut self, slot: AlarmSlot, alarm: &Alarm) -> Result<(), Ds3231Error> {
        match slot {
            AlarmSlot::Alarm1 => {
                let buffer = registers::encode_alarm_1(alarm)?;
                self.write_registers(ALARM_1_REGISTER, &buffer)
            },
            AlarmSlot::Alarm2 => {
                let buffer = registers::encode_alarm_2(alarm)?;
                self.write_registers(ALARM_2_REGISTER, &buffer)
            },
        }
    }

    pub fn get_control(&mut self) -> Result<ControlFlags, Ds3231Error> {
        let [register] = self.read_registers::<1>(CONTROL_REGISTER)?;
        Ok(registers::decode_control(register))
    }

    pub fn set_control(&mut self, control: &ControlFlags) -> Result<(), Ds3231Error> {
        self.write_registers(CONTROL_REGISTER, &[registers::encode_control(control)])
    }

    pub fn get_status(&mut self) -> Result<StatusFlags, Ds3231Error> {
        let [register] = self.read_registers::<1>(STATUS_REGISTER)?;
        Ok(registers::decode_status(register))
    }

    /// Writes the status register. The alarm flags can only be cleared by writing them as
    /// `false`, and `busy` is read only on the chip side.
    pub fn set_status(&mut self, status: &StatusFlags) -> Result<(), Ds3231Error> {
        self.write_registers(STATUS_REGISTER, &[registers::encode_status(status)])
    }

    /// Reads the last temperature conversion. The chip converts on its own every 64 seconds.
    ///
    /// # Errors
    ///
    /// - `Ds3231Error::CommunicationError`: If the bus transfer fails.
    pub fn get_temperature(&mut self) -> Result<Temperature, Ds3231Error> {
        let buffer = self.read_registers::<TEMPERATURE_LEN>(TEMPERATURE_REGISTER)?;
        let temperature = registers::decode_temperature(&buffer);
        log::debug!("DS3231 temperature: {}", temperature);
        Ok(temperature)
    }
}
