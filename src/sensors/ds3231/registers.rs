//! Translation between the DS3231 register contents and the values in [`super::types`].
//!
//! Decoding trusts the chip: registers are assumed to always hold valid BCD, so a malformed
//! nibble gives a wrong value instead of an error. Encoding checks every field before packing
//! it, a value out of range is never masked into the register.

use super::{
    types::{Alarm, AlarmSlot, ControlFlags, DateTime, SquareWaveFrequency, StatusFlags, Temperature},
    Ds3231Error, Field,
};

pub const DATE_TIME_LEN: usize = 7;
pub const ALARM_1_LEN: usize = 4;
pub const ALARM_2_LEN: usize = 3;
pub const TEMPERATURE_LEN: usize = 2;

const SECOND_MINUTE_MASK: u8 = 0b0111_1111;
const HOUR_24_MASK: u8 = 0b0011_1111;
const HOUR_12_MASK: u8 = 0b0001_1111;
const WEEK_DAY_MASK: u8 = 0b0000_0111;
const DATE_MASK: u8 = 0b0011_1111;
const MONTH_MASK: u8 = 0b0001_1111;

const TWELVE_HOUR_MODE: u8 = 0b0100_0000;
const PM: u8 = 0b0010_0000;
const CENTURY: u8 = 0b1000_0000;

/// Bit 7 of an alarm register: the field matches any value.
const ALARM_WILDCARD: u8 = 0b1000_0000;
/// Bit 6 of the alarm day register: the field holds a week day instead of a date.
const ALARM_WEEK_DAY: u8 = 0b0100_0000;

const OSCILLATOR_DISABLED: u8 = 1 << 7;
const BATTERY_BACKED_SQUARE_WAVE: u8 = 1 << 6;
const FORCE_TEMPERATURE_CONVERSION: u8 = 1 << 5;
const SQUARE_WAVE_FREQUENCY_SHIFT: u8 = 3;
const INTERRUPT_CONTROL: u8 = 1 << 2;
const ALARM_2_INTERRUPT: u8 = 1 << 1;
const ALARM_1_INTERRUPT: u8 = 1 << 0;

const OSCILLATOR_STOP_FLAG: u8 = 1 << 7;
const ENABLE_32KHZ_OUTPUT: u8 = 1 << 3;
const BUSY: u8 = 1 << 2;
const ALARM_2_FIRED: u8 = 1 << 1;
const ALARM_1_FIRED: u8 = 1 << 0;

const TEMPERATURE_HALF: u8 = 1 << 7;
const TEMPERATURE_QUARTER: u8 = 1 << 6;

/// Converts a two digit BCD byte to its binary value. Both nibbles must be at most 9.
pub fn bcd_to_binary(bcd: u8) -> u8 {
    bcd - 6 * (bcd >> 4)
}

/// Converts a value from 0 to 99 to its two digit BCD representation. Callers check the range
/// first, see `encode_field`.
pub(crate) fn binary_to_bcd(binary: u8) -> u8 {
    debug_assert!(binary <= 99, "{binary} does not fit in two BCD digits");
    binary + 6 * (binary / 10)
}

/// Decodes an hour register in either hour mode. Bit 6 set means 12 hour mode, in which case
/// bit 5 is the PM flag and the hour goes from 1 to 12.
fn decode_hour(register: u8) -> u8 {
    if register & TWELVE_HOUR_MODE == 0 {
        return bcd_to_binary(register & HOUR_24_MASK);
    }

    let hour = bcd_to_binary(register & HOUR_12_MASK);
    match (register & PM != 0, hour) {
        (false, 12) => 0,
        (true, 12) => 12,
        (true, hour) => hour + 12,
        (false, hour) => hour,
    }
}

fn check(field: Field, value: u16, min: u16, max: u16) -> Result<u16, Ds3231Error> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Ds3231Error::OutOfRange { field, value })
    }
}

/// Validates a field that fits in one register and returns it in BCD.
fn encode_field(field: Field, value: u8, min: u8, max: u8) -> Result<u8, Ds3231Error> {
    let value = check(field, value as u16, min as u16, max as u16)?;
    Ok(binary_to_bcd(value as u8))
}

pub fn decode_date_time(buffer: &[u8; DATE_TIME_LEN]) -> DateTime {
    let [second, minute, hour, week_day, date, month, year] = *buffer;
    let century = if month & CENTURY != 0 { 100 } else { 0 };

    DateTime {
        year: 2000 + century + bcd_to_binary(year) as u16,
        month: bcd_to_binary(month & MONTH_MASK),
        date: bcd_to_binary(date & DATE_MASK),
        week_day: bcd_to_binary(week_day & WEEK_DAY_MASK),
        hour: decode_hour(hour & SECOND_MINUTE_MASK),
        minute: bcd_to_binary(minute & SECOND_MINUTE_MASK),
        second: bcd_to_binary(second & SECOND_MINUTE_MASK),
    }
}

/// Encodes a date and time, always in 24 hour mode.
///
/// # Errors
///
/// - `Ds3231Error::OutOfRange`: If any field is outside of the range documented in `DateTime`.
pub fn encode_date_time(date_time: &DateTime) -> Result<[u8; DATE_TIME_LEN], Ds3231Error> {
    let year = check(Field::Year, date_time.year, 2000, 2199)?;
    let mut month = encode_field(Field::Month, date_time.month, 1, 12)?;
    if year >= 2100 {
        month |= CENTURY;
    }

    Ok([
        encode_field(Field::Second, date_time.second, 0, 59)?,
        encode_field(Field::Minute, date_time.minute, 0, 59)?,
        encode_field(Field::Hour, date_time.hour, 0, 23)?,
        encode_field(Field::WeekDay, date_time.week_day, 1, 7)?,
        encode_field(Field::Date, date_time.date, 1, 31)?,
        month,
        binary_to_bcd((year % 100) as u8),
    ])
}

fn decode_alarm_field(register: u8, decode: impl FnOnce(u8) -> u8) -> Option<u8> {
    if register & ALARM_WILDCARD == 0 {
        Some(decode(register))
    } else {
        None
    }
}

fn encode_alarm_field(field: Field, value: Option<u8>, min: u8, max: u8) -> Result<u8, Ds3231Error> {
    match value {
        Some(value) => encode_field(field, value, min, max),
        None => Ok(ALARM_WILDCARD),
    }
}

/// Decodes the minute, hour and day registers shared by both alarms.
fn decode_alarm_registers(minute: u8, hour: u8, day: u8, second: Option<u8>) -> Alarm {
    let (date, week_day) = if day & ALARM_WILDCARD != 0 {
        (None, None)
    } else if day & ALARM_WEEK_DAY == 0 {
        (Some(bcd_to_binary(day & DATE_MASK)), None)
    } else {
        (None, Some(bcd_to_binary(day & WEEK_DAY_MASK)))
    };

    Alarm {
        date,
        week_day,
        hour: decode_alarm_field(hour, decode_hour),
        minute: decode_alarm_field(minute, |register| bcd_to_binary(register & SECOND_MINUTE_MASK)),
        second,
    }
}

/// Encodes the minute, hour and day registers shared by both alarms.
fn encode_alarm_registers(alarm: &Alarm) -> Result<[u8; 3], Ds3231Error> {
    let day = match (alarm.date, alarm.week_day) {
        (Some(_), Some(_)) => return Err(Ds3231Error::ConflictingAlarmDay),
        (Some(date), None) => encode_field(Field::Date, date, 1, 31)?,
        (None, Some(week_day)) => encode_field(Field::WeekDay, week_day, 1, 7)? | ALARM_WEEK_DAY,
        (None, None) => ALARM_WILDCARD,
    };

    Ok([
        encode_alarm_field(Field::Minute, alarm.minute, 0, 59)?,
        encode_alarm_field(Field::Hour, alarm.hour, 0, 23)?,
        day,
    ])
}

pub fn decode_alarm_1(buffer: &[u8; ALARM_1_LEN]) -> Alarm {
    let [second, minute, hour, day] = *buffer;
    let second = decode_alarm_field(second, |register| bcd_to_binary(register & SECOND_MINUTE_MASK));
    decode_alarm_registers(minute, hour, day, second)
}

/// Encodes the first alarm, the one with a seconds register.
///
/// # Errors
///
/// - `Ds3231Error::ConflictingAlarmDay`: If both `date` and `week_day` are set.
/// - `Ds3231Error::OutOfRange`: If a set field is outside of its range.
pub fn encode_alarm_1(alarm: &Alarm) -> Result<[u8; ALARM_1_LEN], Ds3231Error> {
    let second = encode_alarm_field(Field::Second, alarm.second, 0, 59)?;
    let [minute, hour, day] = encode_alarm_registers(alarm)?;
    Ok([second, minute, hour, day])
}

/// Decodes the second alarm. Its `second` is always `None`.
pub fn decode_alarm_2(buffer: &[u8; ALARM_2_LEN]) -> Alarm {
    let [minute, hour, day] = *buffer;
    decode_alarm_registers(minute, hour, day, None)
}

/// Encodes the second alarm. It has no seconds register, so `alarm.second` is ignored.
///
/// # Errors
///
/// - `Ds3231Error::ConflictingAlarmDay`: If both `date` and `week_day` are set.
/// - `Ds3231Error::OutOfRange`: If a set field is outside of its range.
pub fn encode_alarm_2(alarm: &Alarm) -> Result<[u8; ALARM_2_LEN], Ds3231Error> {
    if let Some(second) = alarm.second {
        log::warn!("{:?} has no seconds register, ignoring second {}", AlarmSlot::Alarm2, second);
    }
    encode_alarm_registers(alarm)
}

pub fn decode_control(register: u8) -> ControlFlags {
    ControlFlags {
        oscillator_disabled: register & OSCILLATOR_DISABLED != 0,
        battery_backed_square_wave: register & BATTERY_BACKED_SQUARE_WAVE != 0,
        force_temperature_conversion: register & FORCE_TEMPERATURE_CONVERSION != 0,
        square_wave_frequency: SquareWaveFrequency::from_bits(register >> SQUARE_WAVE_FREQUENCY_SHIFT),
        interrupt_control_enabled: register & INTERRUPT_CONTROL != 0,
        alarm2_interrupt_enabled: register & ALARM_2_INTERRUPT != 0,
        alarm1_interrupt_enabled: register & ALARM_1_INTERRUPT != 0,
    }
}

pub fn encode_control(control: &ControlFlags) -> u8 {
    let flags = [
        (control.oscillator_disabled, OSCILLATOR_DISABLED),
        (control.battery_backed_square_wave, BATTERY_BACKED_SQUARE_WAVE),
        (control.force_temperature_conversion, FORCE_TEMPERATURE_CONVERSION),
        (control.interrupt_control_enabled, INTERRUPT_CONTROL),
        (control.alarm2_interrupt_enabled, ALARM_2_INTERRUPT),
        (control.alarm1_interrupt_enabled, ALARM_1_INTERRUPT),
    ];
    pack_flags(&flags) | control.square_wave_frequency.bits() << SQUARE_WAVE_FREQUENCY_SHIFT
}

pub fn decode_status(register: u8) -> StatusFlags {
    StatusFlags {
        oscillator_stop_flag: register & OSCILLATOR_STOP_FLAG != 0,
        enable_32khz_output: register & ENABLE_32KHZ_OUTPUT != 0,
        busy: register & BUSY != 0,
        alarm2_fired: register & ALARM_2_FIRED != 0,
        alarm1_fired: register & ALARM_1_FIRED != 0,
    }
}

/// Encodes the status register. Bits 6 to 4 are unused and always written as zero.
pub fn encode_status(status: &StatusFlags) -> u8 {
    pack_flags(&[
        (status.oscillator_stop_flag, OSCILLATOR_STOP_FLAG),
        (status.enable_32khz_output, ENABLE_32KHZ_OUTPUT),
        (status.busy, BUSY),
        (status.alarm2_fired, ALARM_2_FIRED),
        (status.alarm1_fired, ALARM_1_FIRED),
    ])
}

fn pack_flags(flags: &[(bool, u8)]) -> u8 {
    flags.iter()
        .filter(|(set, _)| *set)
        .fold(0_u8, |register, (_, bit)| register | *bit)
}

/// Decodes the temperature registers. The integer part is a two's complement byte and the upper
/// two bits of the fraction register add 0.5 and 0.25 °C.
pub fn decode_temperature(buffer: &[u8; TEMPERATURE_LEN]) -> Temperature {
    let [integer, fraction] = *buffer;
    let integer = integer as i8 as i16;
    let mut quarters = 0;
    if fraction & TEMPERATURE_HALF != 0 {
        quarters += 2;
    }
    if fraction & TEMPERATURE_QUARTER != 0 {
        quarters += 1;
    }
    Temperature::from_quarter_degrees(integer * 4 + quarters)
}

#[cfg(test)]
mod test {
    use super::*;

    fn date_time(year: u16, month: u8, date: u8, week_day: u8, hour: u8, minute: u8, second: u8) -> DateTime {
        DateTime { year, month, date, week_day, hour, minute, second }
    }

    #[test]
    fn test0_bcd_round_trips_every_two_digit_value() {
        for value in 0..=99 {
            assert_eq!(bcd_to_binary(binary_to_bcd(value)), value);
        }
        assert_eq!(binary_to_bcd(59), 0x59);
        assert_eq!(bcd_to_binary(0x31), 31);
    }

    #[test]
    fn test1_date_time_round_trip() {
        let original = date_time(2023, 6, 15, 4, 14, 30, 45);
        let buffer = encode_date_time(&original).unwrap();
        assert_eq!(buffer, [0x45, 0x30, 0x14, 0x04, 0x15, 0x06, 0x23]);
        assert_eq!(decode_date_time(&buffer), original);
    }

    #[test]
    fn test2_century_bit_is_set_from_2100() {
        let original = date_time(2105, 3, 1, 2, 0, 0, 0);
        let buffer = encode_date_time(&original).unwrap();
        assert_eq!(buffer[5], CENTURY | 0x03);
        assert_eq!(buffer[6], 0x05);
        assert_eq!(decode_date_time(&buffer).year, 2105);

        let buffer = encode_date_time(&date_time(2099, 12, 31, 7, 23, 59, 59)).unwrap();
        assert_eq!(buffer[5] & CENTURY, 0);
    }

    #[test]
    fn test16_century_edges_round_trip() {
        let cases = [
            (date_time(2000, 1, 1, 1, 0, 0, 0), 0x01, 0x00),
            (date_time(2099, 12, 31, 5, 23, 59, 59), 0x12, 0x99),
            (date_time(2100, 1, 1, 6, 0, 0, 0), CENTURY | 0x01, 0x00),
            (date_time(2199, 12, 31, 3, 23, 59, 59), CENTURY | 0x12, 0x99),
        ];
        for (original, month, year) in cases {
            let buffer = encode_date_time(&original).unwrap();
            assert_eq!((buffer[5], buffer[6]), (month, year));
            assert_eq!(decode_date_time(&buffer), original);
        }
    }

    #[test]
    fn test3_twelve_hour_registers() {
        assert_eq!(decode_hour(0b0101_0010), 0);
        assert_eq!(decode_hour(0b0110_0010), 14);
        assert_eq!(decode_hour(0b0111_0010), 12);
        assert_eq!(decode_hour(0b0100_1001), 9);
        assert_eq!(decode_hour(0b0010_0011), 23);
    }

    #[test]
    fn test4_date_time_decode_ignores_reserved_bits() {
        let buffer = [0x80 | 0x12, 0x80 | 0x34, 0b0110_0001, 0xF8 | 0x03, 0xC0 | 0x28, 0x60 | 0x11, 0x99];
        assert_eq!(decode_date_time(&buffer), date_time(2099, 11, 28, 3, 13, 34, 12));
    }

    #[test]
    fn test5_date_time_encode_rejects_out_of_range_fields() {
        let valid = date_time(2024, 7, 24, 4, 20, 10, 5);
        let cases = [
            (DateTime { year: 1999, ..valid }, Field::Year, 1999),
            (DateTime { year: 2200, ..valid }, Field::Year, 2200),
            (DateTime { month: 0, ..valid }, Field::Month, 0),
            (DateTime { month: 13, ..valid }, Field::Month, 13),
            (DateTime { date: 32, ..valid }, Field::Date, 32),
            (DateTime { week_day: 0, ..valid }, Field::WeekDay, 0),
            (DateTime { hour: 24, ..valid }, Field::Hour, 24),
            (DateTime { minute: 60, ..valid }, Field::Minute, 60),
            (DateTime { second: 60, ..valid }, Field::Second, 60),
        ];
        for (date_time, field, value) in cases {
            assert_eq!(encode_date_time(&date_time), Err(Ds3231Error::OutOfRange { field, value }));
        }
    }

    #[test]
    fn test6_alarm_wildcards_round_trip() {
        let alarm = Alarm { hour: Some(10), ..Alarm::default() };
        let buffer = encode_alarm_1(&alarm).unwrap();
        assert_eq!(buffer, [ALARM_WILDCARD, ALARM_WILDCARD, 0x10, ALARM_WILDCARD]);
        assert_eq!(decode_alarm_1(&buffer), alarm);

        let buffer = encode_alarm_2(&alarm).unwrap();
        assert_eq!(buffer, [ALARM_WILDCARD, 0x10, ALARM_WILDCARD]);
        assert_eq!(decode_alarm_2(&buffer), alarm);
    }

    #[test]
    fn test7_alarm_week_day_sets_day_select_bit() {
        let alarm = Alarm { week_day: Some(3), hour: Some(7), minute: Some(45), second: Some(0), date: None };
        let buffer = encode_alarm_1(&alarm).unwrap();
        assert_eq!(buffer[3], ALARM_WEEK_DAY | 0x03);
        let decoded = decode_alarm_1(&buffer);
        assert_eq!(decoded.week_day, Some(3));
        assert_eq!(decoded.date, None);
        assert_eq!(decoded, alarm);

        let alarm = Alarm { date: Some(31), ..Alarm::default() };
        let buffer = encode_alarm_2(&alarm).unwrap();
        assert_eq!(buffer[2], 0x31);
        assert_eq!(decode_alarm_2(&buffer), alarm);
    }

    #[test]
    fn test8_alarm_encode_rejects_invalid_alarms() {
        let both = Alarm { date: Some(1), week_day: Some(1), ..Alarm::default() };
        assert_eq!(encode_alarm_1(&both), Err(Ds3231Error::ConflictingAlarmDay));
        assert_eq!(encode_alarm_2(&both), Err(Ds3231Error::ConflictingAlarmDay));

        let late = Alarm { hour: Some(24), ..Alarm::default() };
        assert_eq!(encode_alarm_2(&late), Err(Ds3231Error::OutOfRange { field: Field::Hour, value: 24 }));
        let week_day = Alarm { week_day: Some(8), ..Alarm::default() };
        assert_eq!(encode_alarm_1(&week_day), Err(Ds3231Error::OutOfRange { field: Field::WeekDay, value: 8 }));
    }

    #[test]
    fn test9_second_alarm_drops_seconds() {
        let alarm = Alarm { minute: Some(5), second: Some(30), ..Alarm::default() };
        let buffer = encode_alarm_2(&alarm).unwrap();
        assert_eq!(buffer, [0x05, ALARM_WILDCARD, ALARM_WILDCARD]);
        assert_eq!(decode_alarm_2(&buffer), Alarm { second: None, ..alarm });
    }

    #[test]
    fn test10_alarm_hour_in_twelve_hour_mode() {
        let alarm = decode_alarm_2(&[0x00, 0b0110_0011, ALARM_WILDCARD]);
        assert_eq!(alarm.hour, Some(15));
        assert_eq!(alarm.minute, Some(0));
    }

    #[test]
    fn test11_temperature_decode() {
        assert_eq!(decode_temperature(&[0x19, 0b0100_0000]).celsius(), 25.25);
        assert_eq!(decode_temperature(&[0xE7, 0x00]).celsius(), -25.0);
        assert_eq!(decode_temperature(&[0xE7, 0b1100_0000]).celsius(), -24.25);
        assert_eq!(decode_temperature(&[0x80, 0x00]).celsius(), -128.0);
        assert_eq!(decode_temperature(&[0x7F, 0b1100_0000]).celsius(), 127.75);
    }

    #[test]
    fn test12_control_flags_are_isolated() {
        let cases = [
            (ControlFlags { oscillator_disabled: true, ..ControlFlags::default() }, 1 << 7),
            (ControlFlags { battery_backed_square_wave: true, ..ControlFlags::default() }, 1 << 6),
            (ControlFlags { force_temperature_conversion: true, ..ControlFlags::default() }, 1 << 5),
            (ControlFlags { interrupt_control_enabled: true, ..ControlFlags::default() }, 1 << 2),
            (ControlFlags { alarm2_interrupt_enabled: true, ..ControlFlags::default() }, 1 << 1),
            (ControlFlags { alarm1_interrupt_enabled: true, ..ControlFlags::default() }, 1 << 0),
        ];
        for (control, register) in cases {
            assert_eq!(encode_control(&control), register);
            assert_eq!(decode_control(register), control);
        }
    }

    #[test]
    fn test13_square_wave_frequencies() {
        let frequencies = [
            (SquareWaveFrequency::Freq1Hz, 0b0000_0000),
            (SquareWaveFrequency::Freq1024Hz, 0b0000_1000),
            (SquareWaveFrequency::Freq4096Hz, 0b0001_0000),
            (SquareWaveFrequency::Freq8192Hz, 0b0001_1000),
        ];
        for (square_wave_frequency, register) in frequencies {
            let control = ControlFlags { square_wave_frequency, ..ControlFlags::default() };
            assert_eq!(encode_control(&control), register);
            assert_eq!(decode_control(register).square_wave_frequency, square_wave_frequency);
        }
    }

    #[test]
    fn test14_status_flags_are_isolated() {
        let cases = [
            (StatusFlags { oscillator_stop_flag: true, ..StatusFlags::default() }, 1 << 7),
            (StatusFlags { enable_32khz_output: true, ..StatusFlags::default() }, 1 << 3),
            (StatusFlags { busy: true, ..StatusFlags::default() }, 1 << 2),
            (StatusFlags { alarm2_fired: true, ..StatusFlags::default() }, 1 << 1),
            (StatusFlags { alarm1_fired: true, ..StatusFlags::default() }, 1 << 0),
        ];
        for (status, register) in cases {
            assert_eq!(encode_status(&status), register);
            assert_eq!(decode_status(register), status);
        }
    }

    #[test]
    fn test15_status_reserved_bits_are_ignored() {
        let status = decode_status(0b0111_0000);
        assert_eq!(status, StatusFlags::default());
        assert_eq!(encode_status(&status), 0);
    }
}
