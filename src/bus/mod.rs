//! Register-level access to the device.
//!
//! The driver only ever talks to one device, so the bus trait is addressed by
//! register rather than by device. `I2cBus` binds any embedded_hal blocking
//! I2C peripheral to a device address.

#[cfg(test)]
pub(crate) mod scripted;

use crate::config::Address;
use core::fmt::Debug;
use embedded_hal::blocking::i2c::{Write, WriteRead};

pub trait RegisterBus {
  type Error: Debug;

  /// Writes one value to `register`.
  fn write(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

  /// Reads into `buf` starting at `register` and returns how many bytes the
  /// device delivered.
  fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub struct I2cBus<I2C> {
  i2c: I2C,
  address: u8,
}

impl<I2C> I2cBus<I2C> {
  pub fn new(i2c: I2C, address: Address) -> Self {
    I2cBus {
      i2c,
      address: address.addr(),
    }
  }

  pub fn release(self) -> I2C {
    self.i2c
  }
}

impl<I2C, E> RegisterBus for I2cBus<I2C>
where
  I2C: WriteRead<Error = E> + Write<Error = E>,
  E: Debug,
{
  type Error = E;

  fn write(&mut self, register: u8, value: u8) -> Result<(), E> {
    self.i2c.write(self.address, &[register, value])
  }

  fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<usize, E> {
    self.i2c.write_read(self.address, &[register], buf)?;
    Ok(buf.len())
  }
}
