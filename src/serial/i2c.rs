#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    hal::{gpio::AnyIOPin, i2c::{I2cConfig, I2cDriver, I2C0}, units::FromValueType},
    sys::ESP_ERR_INVALID_ARG,
};

use crate::config::BoardConfig;

/// GPIOs of the ESP32 that can drive an open drain output. 20, 24 and 28 to 31 do not exist,
/// 34 to 39 are input only.
const OUTPUT_CAPABLE_PINS: [usize; 28] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 21, 22, 23, 25, 26, 27, 32, 33,
];

/// Error types related to setting up the I2C bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2CError {
    InvalidPin(usize),
    SamePinForSdaAndScl,
    InvalidArg,
    DriverError,
}

/// Checks the SDA and SCL pins of the configuration.
///
/// # Returns
///
/// The `(sda, scl)` pin numbers, ready to be claimed.
///
/// # Errors
///
/// - `I2CError::InvalidPin`: If a pin does not exist or can not be used as an output.
/// - `I2CError::SamePinForSdaAndScl`: If both lines are set to the same pin.
pub fn i2c_pins(config: &BoardConfig) -> Result<(usize, usize), I2CError> {
    for pin in [config.i2c_sda_pin, config.i2c_scl_pin] {
        if !OUTPUT_CAPABLE_PINS.contains(&pin) {
            return Err(I2CError::InvalidPin(pin));
        }
    }
    if config.i2c_sda_pin == config.i2c_scl_pin {
        return Err(I2CError::SamePinForSdaAndScl);
    }
    Ok((config.i2c_sda_pin, config.i2c_scl_pin))
}

/// Creates the I2C master on `I2C0`, using the pins and baudrate of `config`. The returned
/// driver implements `embedded_hal::i2c::I2c`, so it can be handed to `DS3231` as is.
///
/// Claims the SDA and SCL pins by number, so nothing else may hold them.
///
/// # Errors
///
/// - `I2CError::InvalidPin`, `I2CError::SamePinForSdaAndScl`: See `i2c_pins`.
/// - `I2CError::InvalidArg`: If the driver rejects the configuration.
/// - `I2CError::DriverError`: If the driver could not be installed.
#[cfg(target_os = "espidf")]
pub fn i2c_master(i2c: I2C0, config: &BoardConfig) -> Result<I2cDriver<'static>, I2CError> {
    let (sda, scl) = i2c_pins(config)?;
    let sda = unsafe { AnyIOPin::new(sda as i32) };
    let scl = unsafe { AnyIOPin::new(scl as i32) };

    let i2c_config = I2cConfig::new().baudrate(config.i2c_baudrate_khz.kHz().into());
    let driver = I2cDriver::new(i2c, sda, scl, &i2c_config).map_err(|error| match error.code() {
        ESP_ERR_INVALID_ARG => I2CError::InvalidArg,
        _ => I2CError::DriverError,
    })?;
    log::info!("I2C master ready on SDA {} / SCL {} at {} kHz", config.i2c_sda_pin, config.i2c_scl_pin, config.i2c_baudrate_khz);
    Ok(driver)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test0_default_pins_are_valid() {
        assert_eq!(i2c_pins(&BoardConfig::default()), Ok((21, 22)));
    }

    #[test]
    fn test1_missing_and_input_only_pins_are_rejected() {
        let config = BoardConfig { i2c_sda_pin: 20, ..BoardConfig::default() };
        assert_eq!(i2c_pins(&config), Err(I2CError::InvalidPin(20)));
        let config = BoardConfig { i2c_scl_pin: 35, ..BoardConfig::default() };
        assert_eq!(i2c_pins(&config), Err(I2CError::InvalidPin(35)));
    }

    #[test]
    fn test2_sda_and_scl_must_differ() {
        let config = BoardConfig { i2c_sda_pin: 22, ..BoardConfig::default() };
        assert_eq!(i2c_pins(&config), Err(I2CError::SamePinForSdaAndScl));
    }
}
