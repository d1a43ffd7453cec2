//! Accelerometer samples and their conversion to physical units

use crate::config::FullScale;
use byteorder::{BigEndian, ByteOrder};
use core::fmt;

/// Number of output registers covering X, Y and Z
pub const SAMPLE_LEN: usize = 6;

/// Raw accelerometer counts, one per axis
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AccelerationSample {
  pub x: i16,
  pub y: i16,
  pub z: i16,
}

/// Acceleration in g
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AccelerationG {
  pub x: f32,
  pub y: f32,
  pub z: f32,
}

/// Combines a high/low register pair into a two's complement value.
pub fn decode_axis(hi: u8, lo: u8) -> i16 {
  BigEndian::read_i16(&[hi, lo])
}

impl AccelerationSample {
  /// Decodes ACCEL_XOUT_H..ACCEL_ZOUT_L, high byte first.
  pub fn from_registers(buf: &[u8; SAMPLE_LEN]) -> Self {
    AccelerationSample {
      x: BigEndian::read_i16(&buf[0..2]),
      y: BigEndian::read_i16(&buf[2..4]),
      z: BigEndian::read_i16(&buf[4..6]),
    }
  }

  pub fn to_g(&self, full_scale: FullScale) -> AccelerationG {
    let lsb_per_g = full_scale.sensitivity();
    AccelerationG {
      x: self.x as f32 / lsb_per_g,
      y: self.y as f32 / lsb_per_g,
      z: self.z as f32 / lsb_per_g,
    }
  }
}

impl AccelerationG {
  pub fn magnitude(&self) -> f32 {
    libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
  }
}

impl fmt::Display for AccelerationSample {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} {}", self.x, self.y, self.z)
  }
}

impl fmt::Display for AccelerationG {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:.5} {:.5} {:.5}", self.x, self.y, self.z)
  }
}
