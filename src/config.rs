use crate::sensors::DS3231_ADDR;

const DEFAULT_I2C_BAUDRATE_KHZ: u32 = 100;

/// Settings of the I2C bus and the DS3231 on the controller board.
///
/// The default matches a TinyPICO with the DS3231 on its I2C pins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub i2c_sda_pin: usize,
    pub i2c_scl_pin: usize,
    pub i2c_baudrate_khz: u32,
    pub ds3231_addr: u8,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            i2c_sda_pin: 21,
            i2c_scl_pin: 22,
            i2c_baudrate_khz: DEFAULT_I2C_BAUDRATE_KHZ,
            ds3231_addr: DS3231_ADDR,
        }
    }
}
