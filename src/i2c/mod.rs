extern crate embedded_hal as hal;

use crate::bus::{I2cBus, RegisterBus};
use crate::config::Mpu9225Config;
use crate::error::Error;
use crate::sample::{AccelerationSample, SAMPLE_LEN};
use core::sync::atomic::{AtomicBool, Ordering};
use hal::blocking::delay::{DelayMs, DelayUs};
use hal::blocking::i2c::{Write, WriteRead};
use log::{debug, info, warn};

const MPU9250_CHIP_ID: u8 = 0x71;
const MPU9255_CHIP_ID: u8 = 0x73;
const MPU6500_CHIP_ID: u8 = 0x70;

const PROBE_INTERVAL_MS: u32 = 1000;

#[derive(Copy, Clone, Debug)]
enum Register {
  AccelConfig = 0x1C,
  AccelXoutH = 0x3B,
  PwrMgmt1 = 0x6B,
  WhoAmI = 0x75,
}
impl Register {
  pub fn addr(&self) -> u8 {
    *self as u8
  }
}

/// Accelerometer half of an MPU9225 (MPU9250 family) on a register bus.
///
/// The driver owns the bus and the delay provider for its whole life; they
/// are dropped with it or handed back by [`Mpu9225::release`].
pub struct Mpu9225<B, Delay> {
  bus: B,
  delay: Delay,
  config: Mpu9225Config,
}

impl<I2C, Delay, E> Mpu9225<I2cBus<I2C>, Delay>
where
  I2C: WriteRead<Error = E> + Write<Error = E>,
  E: core::fmt::Debug,
  Delay: DelayMs<u32> + DelayUs<u32>,
{
  /// Binds an I2C peripheral to the configured address and initializes the
  /// device.
  pub fn from_i2c(i2c: I2C, delay: Delay, config: Mpu9225Config) -> Result<Self, Error<E>> {
    Mpu9225::new(I2cBus::new(i2c, config.address), delay, config)
  }
}

impl<B, Delay> Mpu9225<B, Delay>
where
  B: RegisterBus,
  Delay: DelayMs<u32> + DelayUs<u32>,
{
  /// Creates a driver and initializes the device: selects the clock source,
  /// sets the full-scale range and clears the sleep bit, in that order.
  pub fn new(bus: B, delay: Delay, config: Mpu9225Config) -> Result<Self, Error<B::Error>> {
    let mut sensor = Mpu9225::uninitialized(bus, delay, config);
    sensor.configure()?;
    Ok(sensor)
  }

  /// Creates a driver without touching the device.
  pub fn uninitialized(bus: B, delay: Delay, config: Mpu9225Config) -> Self {
    Mpu9225 { bus, delay, config }
  }

  pub fn config(&self) -> &Mpu9225Config {
    &self.config
  }

  /// Hands back the bus and delay provider.
  pub fn release(self) -> (B, Delay) {
    (self.bus, self.delay)
  }

  pub fn configure(&mut self) -> Result<(), Error<B::Error>> {
    info!(
      "MPU9225: Configuring, +/-{}g, clock {:?}",
      self.config.full_scale.g(),
      self.config.clock_source
    );
    let config = self.config;
    self.update_register(Register::PwrMgmt1, |v| config.apply_clock_source(v))?;
    self.update_register(Register::AccelConfig, |v| config.apply_full_scale(v))?;
    self.update_register(Register::PwrMgmt1, |v| config.apply_wake(v))?;
    info!("MPU9225: Awake");
    Ok(())
  }

  pub fn who_am_i(&mut self) -> Result<u8, Error<B::Error>> {
    self.read_register(Register::WhoAmI)
  }

  /// Probes the device once a second until it answers, at most `max_probes`
  /// times. Returns the identity it reported, or `None` if `stop` was raised
  /// before it answered.
  pub fn wait_until_ready(
    &mut self,
    max_probes: u32,
    stop: &AtomicBool,
  ) -> Result<Option<u8>, Error<B::Error>> {
    let mut probes = 0;
    while !stop.load(Ordering::Relaxed) {
      probes += 1;
      match self.who_am_i() {
        Ok(id) => {
          match id {
            MPU9250_CHIP_ID => info!("MPU9225: Ready, identifies as MPU9250 ({:#04x})", id),
            MPU9255_CHIP_ID => info!("MPU9225: Ready, identifies as MPU9255 ({:#04x})", id),
            MPU6500_CHIP_ID => info!("MPU9225: Ready, identifies as MPU6500 ({:#04x})", id),
            _ => warn!("MPU9225: Ready, unrecognized WHO_AM_I {:#04x}", id),
          }
          return Ok(Some(id));
        }
        Err(e) if probes < max_probes => {
          warn!("MPU9225: Not ready ({}), probe {}/{}", e, probes, max_probes);
          self.delay.delay_ms(PROBE_INTERVAL_MS);
        }
        Err(e) => return Err(e),
      }
    }
    info!("MPU9225: Probing interrupted");
    Ok(None)
  }

  /// Reads ACCEL_XOUT_H..ACCEL_ZOUT_L in one transfer.
  pub fn read_acceleration(&mut self) -> Result<AccelerationSample, Error<B::Error>> {
    let mut buf = [0u8; SAMPLE_LEN];
    let received = self
      .bus
      .read(Register::AccelXoutH.addr(), &mut buf)
      .map_err(Error::Bus)?;
    if received != SAMPLE_LEN {
      return Err(Error::MalformedRead {
        expected: SAMPLE_LEN,
        received,
      });
    }
    Ok(AccelerationSample::from_registers(&buf))
  }

  fn read_register(&mut self, reg: Register) -> Result<u8, Error<B::Error>> {
    let mut buf = [0u8; 1];
    let received = self.bus.read(reg.addr(), &mut buf).map_err(Error::Bus)?;
    if received != 1 {
      return Err(Error::MalformedRead {
        expected: 1,
        received,
      });
    }
    Ok(buf[0])
  }

  fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<B::Error>> {
    let retry = self.config.retry;
    let mut attempt = 0;
    loop {
      match self.bus.write(reg.addr(), value) {
        Ok(()) => return Ok(()),
        Err(e) if attempt + 1 < retry.max_attempts => {
          let pause = retry.backoff_us(attempt);
          warn!(
            "MPU9225: Write {:?} failed ({:?}), retrying in {}us",
            reg, e, pause
          );
          self.delay.delay_us(pause);
          attempt += 1;
        }
        Err(e) => return Err(Error::Bus(e)),
      }
    }
  }

  fn update_register<F>(&mut self, reg: Register, f: F) -> Result<(), Error<B::Error>>
  where
    F: FnOnce(u8) -> u8,
  {
    let old = self.read_register(reg)?;
    let new = f(old);
    debug!("MPU9225: {:?}({:#04x}) {:#04x} -> {:#04x}", reg, reg.addr(), old, new);
    self.write_register(reg, new)
  }
}
