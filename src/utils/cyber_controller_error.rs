use std::fmt;

use crate::{sensors::Ds3231Error, serial::I2CError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyberControllerError {
    I2CError(I2CError),
    Ds3231Error(Ds3231Error),
}

impl From<I2CError> for CyberControllerError {
    fn from(value: I2CError) -> Self {
        CyberControllerError::I2CError(value)
    }
}

impl From<Ds3231Error> for CyberControllerError {
    fn from(value: Ds3231Error) -> Self {
        CyberControllerError::Ds3231Error(value)
    }
}

impl fmt::Display for CyberControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyberControllerError::I2CError(error) => write!(f, "I2C error: {error:?}"),
            CyberControllerError::Ds3231Error(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for CyberControllerError {}
